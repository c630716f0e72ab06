//! Configuration for building analog operations.
//!
//! Supports loading configuration from:
//! 1. A YAML file describing the register
//! 2. Environment variables (with RYDRA_ prefix)
//!
//! Environment variables take precedence over the file.
//!
//! ```yaml
//! register:
//!   coordinates: [[0.0, 0.0], [5.0, 0.0]]
//!   c6: 865723.02
//!   pattern:
//!     amplitude: 0.0
//!     detuning: 2.0
//!     amplitude_weights: [0.0, 0.0]
//!     detuning_weights: [1.0, 0.5]
//! add_pattern: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{AnalogError, AnalogResult};
use crate::register::Register;

/// Overrides the register's C6 coefficient.
pub const ENV_C6: &str = "RYDRA_C6";

/// Overrides [`AnalogConfig::add_pattern`].
pub const ENV_ADD_PATTERN: &str = "RYDRA_ADD_PATTERN";

/// Register and defaults shared by all operations built from one config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalogConfig {
    /// The register geometry.
    pub register: Register,

    /// Default for including the pattern block.
    #[serde(default = "default_true")]
    pub add_pattern: bool,
}

fn default_true() -> bool {
    true
}

impl AnalogConfig {
    /// A config around `register` with default settings.
    pub fn new(register: Register) -> Self {
        Self {
            register,
            add_pattern: true,
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> AnalogResult<Self> {
        let config: AnalogConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| AnalogError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnalogResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AnalogError::Config(format!("{}: {e}", path.display())))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_yaml_str(&contents)
    }

    /// Load from file, then apply environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> AnalogResult<Self> {
        Self::from_file(path)?.merge_env()
    }

    /// Apply `RYDRA_*` environment overrides.
    pub fn merge_env(self) -> AnalogResult<Self> {
        self.merge_from(|key| std::env::var(key).ok())
    }

    fn merge_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> AnalogResult<Self> {
        if let Some(v) = lookup(ENV_C6) {
            let c6 = v
                .parse::<f64>()
                .map_err(|e| AnalogError::Config(format!("{ENV_C6}={v}: {e}")))?;
            self.register = self.register.with_c6(c6)?;
        }
        if let Some(v) = lookup(ENV_ADD_PATTERN) {
            match parse_bool(&v) {
                Some(b) => self.add_pattern = b,
                None => warn!("Ignoring {ENV_ADD_PATTERN}={v}: expected a boolean"),
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the register.
    pub fn validate(&self) -> AnalogResult<()> {
        self.register.validate()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
