//! Namespace configuration via TOML
//!
//! A prefixed facade can be built from a small config file instead of
//! wiring a [`KeyCodec`] by hand:
//!
//! ```toml
//! key_prefix = "tenant-a:"
//! unscoped_commands = ["DEBUG"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use keyspace_core::{Error, KeyCodec, Result};

use crate::dispatch::Dispatch;
use crate::prefixed::KeyPrefixed;

/// Namespace configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyspaceConfig {
    /// Prefix prepended to every key-bearing argument.
    pub key_prefix: String,
    /// Extra command names rejected on the generic path inside the
    /// namespace, on top of the built-in list.
    pub unscoped_commands: Vec<String>,
}

impl KeyspaceConfig {
    /// Config for `prefix` with no extra unscoped commands.
    pub fn new(prefix: impl Into<String>) -> Self {
        KeyspaceConfig {
            key_prefix: prefix.into(),
            unscoped_commands: Vec::new(),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Keyspace namespace configuration
#
# Prefix prepended to every key-bearing argument. Must not be empty.
key_prefix = "app:"

# Extra command names rejected inside the namespace, on top of
# RANDOMKEY, FLUSHDB, FLUSHALL and SWAPDB.
unscoped_commands = []
"#
    }

    /// Parse a config from TOML text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text does not parse or the config is
    /// invalid.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: KeyspaceConfig = toml::from_str(text).map_err(|e| Error::Config {
            reason: format!("failed to parse keyspace config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Config { reason } => Error::Config {
                reason: format!("{} ({})", reason, path.display()),
            },
            other => other,
        })
    }

    /// Serialize this config to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("failed to serialize keyspace config: {}", e),
        })
    }

    /// Check the config without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an empty prefix or a blank command name.
    pub fn validate(&self) -> Result<()> {
        if self.key_prefix.is_empty() {
            return Err(Error::Config {
                reason: "key_prefix must not be empty".to_string(),
            });
        }
        if let Some(blank) = self.unscoped_commands.iter().find(|n| n.trim().is_empty()) {
            return Err(Error::Config {
                reason: format!("unscoped command name '{}' is blank", blank),
            });
        }
        Ok(())
    }

    /// Build the codec this config describes.
    pub fn codec(&self) -> Result<KeyCodec> {
        self.validate()?;
        Ok(KeyCodec::new(self.key_prefix.clone().into_bytes())?
            .with_unscoped_commands(self.unscoped_commands.iter().cloned()))
    }

    /// Wrap `inner` in a prefixed facade.
    pub fn apply<D: Dispatch>(&self, inner: D) -> Result<KeyPrefixed<D>> {
        let codec = self.codec()?;
        info!(
            prefix = %self.key_prefix,
            unscoped = self.unscoped_commands.len(),
            "keyspace namespace configured"
        );
        Ok(KeyPrefixed::new(inner, codec))
    }
}
