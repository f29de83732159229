use std::env;

pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home_dir) = env::var_os("HOME") {
            return path.replacen("~", &home_dir.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[test]
fn test_expand_tilde_leaves_absolute_paths() {
    assert_eq!(expand_tilde("/etc/azure/cert.pem"), "/etc/azure/cert.pem");
    assert_eq!(expand_tilde("relative/~/cert.pem"), "relative/~/cert.pem");
}
