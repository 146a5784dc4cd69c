use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Knobs for [`crate::Correlator`].
///
/// Usually embedded in a larger debugger config; `from_toml_str` accepts the
/// table on its own:
///
/// ```toml
/// skip_synthetic = true
/// one_based_positions = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorrelateConfig {
    /// Synthetic call nodes still claim their call instruction but produce no
    /// operation.
    pub skip_synthetic: bool,
    /// Report lines and columns counting from 1 (javac's `LineMap`
    /// convention) instead of 0.
    pub one_based_positions: bool,
}

impl Default for CorrelateConfig {
    fn default() -> Self {
        Self {
            skip_synthetic: true,
            one_based_positions: true,
        }
    }
}

impl CorrelateConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub(crate) fn position_base(&self) -> u32 {
        u32::from(self.one_based_positions)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid correlation config: {0}")]
    Toml(#[from] toml::de::Error),
}
