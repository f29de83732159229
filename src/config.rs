use crate::constants::{DEFAULT_REGION, ENV_PREFIX};
use crate::error::CloudError;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigVar {
    pub key: String,
    pub value: String,
}

impl ConfigVar {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ConfigVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked_suffix = match self.value.char_indices().rev().nth(3) {
            Some((index, _)) => &self.value[index..],
            None => &self.value[..],
        };

        write!(f, "{}: \"****{}\"", self.key, masked_suffix)
    }
}

pub trait ConfigVarFinder {
    /// Returns a reference to the ConfigVar with the given key, if found.
    fn get_var(&self, key: &str) -> Option<&ConfigVar>;

    /// Returns the value associated with the given key, if found.
    fn get_value(&self, key: &str) -> Option<&str>;

    /// Parses the value for `key`, falling back to `default` when the key is unset.
    fn parse_value<T: FromStr>(&self, key: &str, default: T) -> Result<T, CloudError> {
        match self.get_value(key) {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Ok(value),
                Err(_) => Err(CloudError::Config(format!(
                    "Invalid value '{}' for config variable '{}'",
                    raw, key
                ))),
            },
            None => Ok(default),
        }
    }
}

impl ConfigVarFinder for [ConfigVar] {
    fn get_var(&self, key: &str) -> Option<&ConfigVar> {
        self.iter().find(|cv| cv.key == key)
    }

    fn get_value(&self, key: &str) -> Option<&str> {
        self.get_var(key)
            .map(|cv| cv.value.as_str())
            .filter(|value| !value.trim().is_empty())
    }
}

/// Account and region the adapter acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderContext {
    pub account_number: String,
    pub region_id: String,
}

impl ProviderContext {
    pub fn from_config_vars(config_vars: &[ConfigVar]) -> Option<Self> {
        let account_number = config_vars.get_value("SUBSCRIPTION_ID")?.trim().to_string();
        let region_id = config_vars
            .get_value("REGION")
            .unwrap_or(DEFAULT_REGION)
            .to_string();

        Some(Self {
            account_number,
            region_id,
        })
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("azimg").join("config.yaml"))
}

/// Reads a flat YAML map of config variables. Keys are upper-cased.
pub fn read_config_file(path: &Path) -> Result<Vec<ConfigVar>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            error!("{:?}", e);
            bail!("Failed to read config file '{}'", path.display())
        }
    };
    parse_config_yaml(&contents)
}

pub fn parse_config_yaml(contents: &str) -> Result<Vec<ConfigVar>> {
    if contents.trim().is_empty() {
        return Ok(vec![]);
    }

    let entries: BTreeMap<String, serde_yaml::Value> = match serde_yaml::from_str(contents) {
        Ok(entries) => entries,
        Err(e) => {
            error!("{:?}", e);
            bail!("Config file must be a flat map of keys to values")
        }
    };

    let mut config_vars = vec![];
    for (key, value) in entries {
        let value = match value {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Null => continue,
            _ => {
                warn!("Skipping config key '{}': value is not a scalar", key);
                continue;
            }
        };
        config_vars.push(ConfigVar {
            key: key.to_uppercase(),
            value,
        });
    }

    Ok(config_vars)
}

/// Picks the `AZURE_`-prefixed variables out of an environment listing.
pub fn config_vars_from_env<I>(vars: I) -> Vec<ConfigVar>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .filter(|stripped| !stripped.is_empty())
                .map(|stripped| ConfigVar {
                    key: stripped.to_string(),
                    value,
                })
        })
        .collect()
}

/// Later variables override earlier ones with the same key.
pub fn merge_config_vars(base: Vec<ConfigVar>, overrides: Vec<ConfigVar>) -> Vec<ConfigVar> {
    let mut merged = base;
    for config_var in overrides {
        match merged.iter_mut().find(|cv| cv.key == config_var.key) {
            Some(existing) => existing.value = config_var.value,
            None => merged.push(config_var),
        }
    }
    merged
}

pub fn load_config_vars(config_path: Option<&Path>) -> Result<Vec<ConfigVar>> {
    let file_vars = match config_path {
        Some(path) => read_config_file(path)?,
        None => match default_config_path() {
            Some(path) if path.is_file() => {
                debug!("Using config file '{}'", path.display());
                read_config_file(&path)?
            }
            _ => vec![],
        },
    };

    let env_vars = config_vars_from_env(std::env::vars());
    Ok(merge_config_vars(file_vars, env_vars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_var_display_is_masked() {
        let var = ConfigVar::new("SUBSCRIPTION_ID", "1234-5678-abcd");
        assert_eq!(var.to_string(), "SUBSCRIPTION_ID: \"****abcd\"");

        let short = ConfigVar::new("REGION", "us");
        assert_eq!(short.to_string(), "REGION: \"****us\"");
    }

    #[test]
    fn test_env_vars_are_filtered_by_prefix() {
        let vars = vec![
            ("AZURE_SUBSCRIPTION_ID".to_string(), "sub-1".to_string()),
            ("AZURE_".to_string(), "ignored".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ];
        let config_vars = config_vars_from_env(vars);
        assert_eq!(config_vars, vec![ConfigVar::new("SUBSCRIPTION_ID", "sub-1")]);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = parse_config_yaml("subscription_id: from-file\nregion: West Europe\nmax_concurrent_captures: 2\n")
            .unwrap();
        let env = vec![ConfigVar::new("SUBSCRIPTION_ID", "from-env")];
        let merged = merge_config_vars(file, env);

        assert_eq!(merged.get_value("SUBSCRIPTION_ID"), Some("from-env"));
        assert_eq!(merged.get_value("REGION"), Some("West Europe"));
        assert_eq!(merged.parse_value("MAX_CONCURRENT_CAPTURES", 4usize).unwrap(), 2);
    }

    #[test]
    fn test_nested_yaml_is_rejected() {
        assert!(parse_config_yaml("- a\n- b\n").is_err());
    }

    #[test]
    fn test_provider_context_requires_subscription() {
        assert_eq!(ProviderContext::from_config_vars(&[]), None);

        let vars = vec![ConfigVar::new("SUBSCRIPTION_ID", "acct")];
        let ctx = ProviderContext::from_config_vars(&vars).unwrap();
        assert_eq!(ctx.account_number, "acct");
        assert_eq!(ctx.region_id, DEFAULT_REGION);
    }

    #[test]
    fn test_invalid_numeric_value_is_config_error() {
        let vars = vec![ConfigVar::new("CAPTURE_TIMEOUT_SECS", "soon")];
        assert!(matches!(
            vars.parse_value("CAPTURE_TIMEOUT_SECS", 10u64),
            Err(CloudError::Config(_))
        ));
    }
}
