//! Realm configuration.
//!
//! Configuration is a small JSON document; every field is optional and falls
//! back to the values in [`limits`](crate::limits) and
//! [`names`](crate::names):
//!
//! ```json
//! {
//!   "globalName": "Cls",
//!   "maxCallDepth": 256,
//!   "maxPrototypeDepth": 1000
//! }
//! ```

use crate::limits;
use crate::names::DEFAULT_GLOBAL_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Settings applied to a realm at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ClsConfig {
    /// Global binding the factory registers itself under.
    pub global_name: String,
    /// Maximum number of nested calls.
    pub max_call_depth: u32,
    /// Maximum number of prototype hops per property lookup.
    pub max_prototype_depth: u32,
}

impl Default for ClsConfig {
    fn default() -> Self {
        Self {
            global_name: DEFAULT_GLOBAL_NAME.to_string(),
            max_call_depth: limits::MAX_CALL_DEPTH,
            max_prototype_depth: limits::MAX_PROTOTYPE_CHAIN_DEPTH,
        }
    }
}

impl ClsConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.global_name.is_empty() {
            return Err(ConfigError::Invalid {
                field: "globalName",
                reason: "must not be empty",
            });
        }
        if self.max_call_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "maxCallDepth",
                reason: "must be at least 1",
            });
        }
        if self.max_prototype_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "maxPrototypeDepth",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod tests;
