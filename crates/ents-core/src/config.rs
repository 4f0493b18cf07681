//! Engine configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```toml
//! max_traversal_depth = 64
//! max_answer_attempts = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EntsError, Result};

/// Default bound on the length of a single ancestor/descendant path
pub const DEFAULT_MAX_TRAVERSAL_DEPTH: usize = 64;

/// Default number of times a text front end re-prompts on an unrecognized answer
pub const DEFAULT_MAX_ANSWER_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Longest parent/child path followed by a traversal before it gives up
    /// and returns what it has collected so far
    pub max_traversal_depth: usize,

    /// Prompts allowed per oracle question before an unrecognized reply
    /// counts as a decline
    pub max_answer_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: DEFAULT_MAX_TRAVERSAL_DEPTH,
            max_answer_attempts: DEFAULT_MAX_ANSWER_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML, names an unknown key,
    /// or sets a bound to zero.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.max_traversal_depth == 0 {
            return Err(EntsError::Config {
                message: "max_traversal_depth must be at least 1".to_string(),
            });
        }
        if self.max_answer_attempts == 0 {
            return Err(EntsError::Config {
                message: "max_answer_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
