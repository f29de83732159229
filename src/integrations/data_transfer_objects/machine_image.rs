use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Unknown,
    Unix,
    Windows,
    Ubuntu,
    Debian,
    CentOs,
    Rhel,
    FedoraCore,
    Suse,
    FreeBsd,
    Solaris,
}

impl Platform {
    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    pub fn is_unix(&self) -> bool {
        !matches!(self, Platform::Windows | Platform::Unknown)
    }

    /// Best-effort guess from free text such as an image name or description.
    pub fn guess(descriptor: &str) -> Platform {
        let text = descriptor.to_lowercase();

        if text.contains("ubuntu") {
            Platform::Ubuntu
        } else if text.contains("centos") {
            Platform::CentOs
        } else if text.contains("red hat") || text.contains("redhat") || text.contains("rhel") {
            Platform::Rhel
        } else if text.contains("fedora") {
            Platform::FedoraCore
        } else if text.contains("debian") {
            Platform::Debian
        } else if text.contains("suse") {
            Platform::Suse
        } else if text.contains("freebsd") {
            Platform::FreeBsd
        } else if text.contains("solaris") {
            Platform::Solaris
        } else if text.contains("windows") {
            Platform::Windows
        } else if text.contains("linux") || text.contains("unix") {
            Platform::Unix
        } else {
            Platform::Unknown
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Platform::Unknown => write!(f, "unknown"),
            Platform::Unix => write!(f, "unix"),
            Platform::Windows => write!(f, "windows"),
            Platform::Ubuntu => write!(f, "ubuntu"),
            Platform::Debian => write!(f, "debian"),
            Platform::CentOs => write!(f, "centos"),
            Platform::Rhel => write!(f, "rhel"),
            Platform::FedoraCore => write!(f, "fedora"),
            Platform::Suse => write!(f, "suse"),
            Platform::FreeBsd => write!(f, "freebsd"),
            Platform::Solaris => write!(f, "solaris"),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unknown" => Ok(Platform::Unknown),
            "unix" | "linux" => Ok(Platform::Unix),
            "windows" => Ok(Platform::Windows),
            "ubuntu" => Ok(Platform::Ubuntu),
            "debian" => Ok(Platform::Debian),
            "centos" => Ok(Platform::CentOs),
            "rhel" | "redhat" => Ok(Platform::Rhel),
            "fedora" => Ok(Platform::FedoraCore),
            "suse" => Ok(Platform::Suse),
            "freebsd" => Ok(Platform::FreeBsd),
            "solaris" => Ok(Platform::Solaris),
            other => Err(format!("Unknown platform '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Architecture {
    I32,
    I64,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Architecture::I32 => write!(f, "i32"),
            Architecture::I64 => write!(f, "i64"),
        }
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "i32" | "x86" | "i386" => Ok(Architecture::I32),
            "i64" | "x86_64" | "amd64" => Ok(Architecture::I64),
            other => Err(format!("Unknown architecture '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineImageState {
    Pending,
    Active,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineImageType {
    Storage,
    Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineImageFormat {
    Aws,
    Vmdk,
    Vhd,
    Ovf,
}

/// A machine image as seen through the vendor-neutral model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineImage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub platform: Platform,
    pub architecture: Architecture,
    pub state: MachineImageState,
    pub region: String,
    pub media_link: Option<String>,
    pub software: String,
    pub image_type: MachineImageType,
    pub tags: HashMap<String, String>,
}

impl MachineImage {
    /// Text the platform and software heuristics are run against.
    pub fn descriptor(&self) -> String {
        format!("{} {} {}", self.id, self.name, self.description)
    }
}

#[test]
fn test_platform_guess() {
    assert_eq!(Platform::guess("Windows Server 2008 R2 SP1"), Platform::Windows);
    assert_eq!(Platform::guess("Ubuntu Server 12.04 LTS"), Platform::Ubuntu);
    assert_eq!(Platform::guess("OpenLogic CentOS 6.2"), Platform::CentOs);
    assert_eq!(Platform::guess("SUSE Linux Enterprise Server"), Platform::Suse);
    assert_eq!(Platform::guess("some linux appliance"), Platform::Unix);
    assert_eq!(Platform::guess("custom appliance"), Platform::Unknown);
    // Linux images built for the vendor's cloud mention it by name.
    assert_eq!(
        Platform::guess("CentOS 6.2 provided by OpenLogic for Windows Azure"),
        Platform::CentOs
    );
}

#[test]
fn test_platform_families() {
    assert!(Platform::Windows.is_windows());
    assert!(!Platform::Windows.is_unix());
    assert!(Platform::Ubuntu.is_unix());
    assert!(Platform::Unix.is_unix());
    assert!(!Platform::Unknown.is_unix());
    assert!(!Platform::Unknown.is_windows());
}

#[test]
fn test_platform_from_str() {
    assert_eq!("Linux".parse::<Platform>(), Ok(Platform::Unix));
    assert_eq!("windows".parse::<Platform>(), Ok(Platform::Windows));
    assert!("beos".parse::<Platform>().is_err());
}
