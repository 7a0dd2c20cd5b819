//! Observation options.

use serde::Deserialize;

use crate::error::ObserveError;

/// What happens when a listener writes while a cascade is still running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reentrancy {
    /// A nested cascade skips every event key whose listeners are running.
    #[default]
    SkipActive,
    /// Nested cascades fire every key, up to `max_depth` nested cascades.
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ObserveOptions {
    pub reentrancy: Reentrancy,
    /// Nesting limit for [`Reentrancy::Allow`]. A write beyond it is stored
    /// without notification.
    pub max_depth: usize,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            reentrancy: Reentrancy::SkipActive,
            max_depth: 64,
        }
    }
}

impl ObserveOptions {
    /// Parses options from JSON text; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ObserveError> {
        Ok(serde_json::from_str(text)?)
    }
}
