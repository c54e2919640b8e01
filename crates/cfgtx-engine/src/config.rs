//! Engine configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! root_group = "Channel"
//! log_profile = "production"
//! ```

use serde::Deserialize;
use std::path::Path;

use cfgtx_core::authorize::DEFAULT_ROOT_GROUP;
use cfgtx_core::errors::{ConfigTxError, Result};
use cfgtx_core::logging_facility::{self, Profile};
use cfgtx_core::AuthorizerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Name of the root group of every channel's configuration tree
    pub root_group: String,
    pub log_profile: Profile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_group: DEFAULT_ROOT_GROUP.to_string(),
            log_profile: Profile::default(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` on malformed TOML, unknown keys or an empty
    /// root group name.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigTxError::InvalidConfig {
            message: e.to_string(),
        })?;

        if config.root_group.is_empty() {
            return Err(ConfigTxError::InvalidConfig {
                message: "root_group must not be empty".to_string(),
            });
        }

        Ok(config)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| ConfigTxError::InvalidConfig {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&input)
    }

    pub fn authorizer(&self) -> AuthorizerConfig {
        AuthorizerConfig {
            root_group: self.root_group.clone(),
        }
    }

    /// Install the global subscriber for the configured profile
    ///
    /// Returns `false` if a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        logging_facility::init(self.log_profile)
    }
}
