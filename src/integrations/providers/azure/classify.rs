use crate::constants::{CANONICAL, MICROSOFT, PUBLIC, SQL_SERVER};
use crate::integrations::data_transfer_objects::Platform;

/// Value of the `Category` field of an `OSImage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCategory {
    User,
    Microsoft,
    Partner,
    Canonical,
    Other,
}

impl ImageCategory {
    pub fn parse(category: Option<&str>) -> Self {
        let category = match category {
            Some(category) => category.trim(),
            None => return ImageCategory::Other,
        };

        if category.eq_ignore_ascii_case("user") {
            ImageCategory::User
        } else if category.eq_ignore_ascii_case("microsoft") {
            ImageCategory::Microsoft
        } else if category.eq_ignore_ascii_case("partner") {
            ImageCategory::Partner
        } else if category.eq_ignore_ascii_case("canonical") {
            ImageCategory::Canonical
        } else {
            ImageCategory::Other
        }
    }

    pub fn owner(&self, account_number: &str) -> String {
        match self {
            ImageCategory::User => account_number.to_string(),
            ImageCategory::Microsoft | ImageCategory::Other => MICROSOFT.to_string(),
            ImageCategory::Partner => PUBLIC.to_string(),
            ImageCategory::Canonical => CANONICAL.to_string(),
        }
    }
}

pub fn owner_for_category(category: Option<&str>, account_number: &str) -> String {
    ImageCategory::parse(category).owner(account_number)
}

/// Explicit `OS` field. Anything but windows/linux carries no information.
pub fn platform_from_os_field(os: Option<&str>) -> Option<Platform> {
    let os = os?.trim();
    if os.eq_ignore_ascii_case("windows") {
        Some(Platform::Windows)
    } else if os.eq_ignore_ascii_case("linux") {
        Some(Platform::Unix)
    } else {
        None
    }
}

/// An explicit Unix platform is only refined to a Unix distribution guessed
/// from the descriptor; an explicit Windows is kept as is.
pub fn derive_platform(explicit: Option<Platform>, descriptor: &str) -> Platform {
    match explicit {
        None => Platform::guess(descriptor),
        Some(Platform::Unix) => match Platform::guess(descriptor) {
            guessed if guessed.is_unix() => guessed,
            _ => Platform::Unix,
        },
        Some(platform) => platform,
    }
}

pub fn detect_software(descriptor: &str) -> String {
    if descriptor.contains(SQL_SERVER) {
        SQL_SERVER.to_string()
    } else {
        String::new()
    }
}

/// Search-side platform rule: unknown images never match, the Windows and
/// Unix families match any member, anything else needs equality.
pub fn platform_matches(requested: Platform, actual: Platform) -> bool {
    if actual == Platform::Unknown {
        false
    } else if requested.is_windows() {
        actual.is_windows()
    } else if requested == Platform::Unix {
        actual.is_unix()
    } else {
        requested == actual
    }
}
