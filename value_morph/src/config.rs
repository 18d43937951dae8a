//! Engine configuration.
//!
//! ```toml
//! [boolean]
//! truthy = ["true", "1", "yes", "on", "enabled"]
//! falsy = ["false", "0", "no", "off", "disabled"]
//! ```
//!
//! Every section and key is optional; missing ones take the built-in
//! defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scalar::BoolVocabulary;

/// Configuration of a [`Morph`](crate::dispatch::Morph) engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MorphConfig {
    /// Tokens accepted by boolean coercion
    pub boolean: BoolVocabulary,
}

impl MorphConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: MorphConfig = toml::from_str(text)?;
        config.boolean.validate()?;
        Ok(config)
    }

    pub fn with_vocabulary(mut self, vocabulary: BoolVocabulary) -> Self {
        self.boolean = vocabulary;
        self
    }
}
