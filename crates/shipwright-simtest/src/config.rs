//! Harness configuration, read from a JSON file.
//!
//! ```json
//! {
//!   "data_root": "./ftl-data",
//!   "catalog": "data/blueprints.xml",
//!   "player_ships": ["PLAYER_SHIP_HARD"],
//!   "blueprints": [],
//!   "snapshot_dir": "./snapshots"
//! }
//! ```
//!
//! Only `data_root` is required. Relative paths are resolved against the
//! directory holding the configuration file.

use serde::Deserialize;
use shipwright_logic::classify::PlayerShipRegistry;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct HarnessConfig {
    /// Directory containing the unpacked `data/` tree.
    pub data_root: PathBuf,
    /// Archive path of the blueprint catalog.
    #[serde(default = "default_catalog")]
    pub catalog: String,
    /// Player blueprint names. `None` uses the stock roster.
    #[serde(default)]
    pub player_ships: Option<Vec<String>>,
    /// Blueprints to build. Empty builds every record.
    #[serde(default)]
    pub blueprints: Vec<String>,
    /// Where to write graph snapshots, if anywhere.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
}

fn default_catalog() -> String {
    "data/blueprints.xml".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file, anchoring relative paths at its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            config.data_root = base.join(&config.data_root);
            config.snapshot_dir = config.snapshot_dir.map(|dir| base.join(dir));
        }
        Ok(config)
    }

    pub fn registry(&self) -> PlayerShipRegistry {
        match &self.player_ships {
            Some(names) => PlayerShipRegistry::from_names(names.iter().cloned()),
            None => PlayerShipRegistry::vanilla(),
        }
    }
}
