use rand::distr::Alphanumeric;
use rand::{Rng, rng};

/// Name for a captured image when the caller does not pick one.
pub fn generate_image_name() -> String {
    let suffix: String = rng()
        .sample_iter(Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("image-{}", suffix.to_lowercase())
}

#[test]
fn test_generated_image_names_are_unique() {
    let first = generate_image_name();
    let second = generate_image_name();
    assert!(first.starts_with("image-"));
    assert_eq!(first.len(), "image-".len() + 12);
    assert_ne!(first, second);
}
