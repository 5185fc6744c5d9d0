use crate::logging::LogConfig;
use gem_consensus::ChainConfig;
use gem_governance::GovernanceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Command-line tool configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Chain rules queries execute under
    pub chain: ChainConfig,

    /// Governance contract location and query gas
    pub governance: GovernanceConfig,

    pub logging: LogConfig,
}

impl CliConfig {
    /// Load from file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CliConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e)),
            None => Ok(Self::default()),
        }
    }

    /// Save to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
