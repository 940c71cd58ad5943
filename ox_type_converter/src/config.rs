use serde::{Deserialize, Serialize};

/// Default bound on chained re-dispatches within one conversion.
pub const DEFAULT_MAX_REDISPATCH_DEPTH: usize = 32;

/// Engine settings. Missing fields take their defaults, so partial documents load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How many times a strategy's intermediate result may be fed back into
    /// resolution before the conversion fails with `DidNotConverge`.
    pub max_redispatch_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_redispatch_depth: DEFAULT_MAX_REDISPATCH_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
