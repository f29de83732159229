use crate::constants::{CANONICAL, MICROSOFT, PUBLIC};

/// Human readable owner column; the owner sentinels are not meant for display.
pub fn format_owner(owner: &str) -> String {
    match owner {
        MICROSOFT => "Microsoft".to_string(),
        PUBLIC => "Public (partner)".to_string(),
        CANONICAL => "Canonical".to_string(),
        account => account.to_string(),
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
