use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from review-metrics.toml.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MetricsConfig {
    pub client: ClientConfig,
    pub tiers: TierConfig,
}

/// How to invoke the hosting CLI that lists merged pull requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub command: String,
    /// Leading arguments; the state, limit and field selection are appended.
    pub args: Vec<String>,
    pub limit: u32,
}

/// Tier labels in display order, plus the name used when none match.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    pub names: Vec<String>,
    pub fallback: String,
}

// --- Default implementations ---

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            command: "gh".to_string(),
            args: vec!["pr".to_string(), "list".to_string()],
            limit: 1000,
        }
    }
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            names: ["SHIP", "CRUISE", "RAFT", "ANCHOR"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback: "UNTIERED".to_string(),
        }
    }
}

/// Load config from `path`, or defaults if the file is missing or unparsable.
pub fn load_config(path: &Path) -> MetricsConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(cfg) => {
                tracing::debug!(path = %path.display(), "loaded config");
                cfg
            }
            Err(e) => {
                tracing::warn!("failed to parse {}: {e}", path.display());
                MetricsConfig::default()
            }
        },
        Err(_) => MetricsConfig::default(),
    }
}
