//! Tunables of the expression core, loadable from TOML.
//!
//! ```toml
//! [decider]
//! host_integer = "i32"
//! equality_chains = true
//!
//! [defaults]
//! max_array_length = 65536
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub decider: DeciderConfig,
    pub defaults: DefaultsConfig,
}

/// Integer width the decider narrows evaluated operands to before
/// comparing them. Values that do not fit make the rule not fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostInteger {
    #[default]
    I32,
    I64,
    Unbounded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeciderConfig {
    pub host_integer: HostInteger,
    /// Enables the `x == v && x == w` contradiction rule on conjunctions.
    pub equality_chains: bool,
}

impl Default for DeciderConfig {
    fn default() -> Self {
        DeciderConfig {
            host_integer: HostInteger::I32,
            equality_chains: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Upper bound on the length of default array literals.
    pub max_array_length: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            max_array_length: 65_536,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
