//! Recordings available for the edit.
//!
//! The recordings catalog is external; the timeline only needs `(name,
//! duration)` pairs from it. `AssetCatalog` is the JSON-file flavour used by
//! the command line tool.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub duration: f64,
}

/// Source of clips that can be appended or inserted.
pub trait AssetProvider {
    fn assets(&self) -> Vec<Asset>;

    fn find(&self, name: &str) -> Option<Asset> {
        self.assets().into_iter().find(|a| a.name == name)
    }
}

/// Catalog loaded from a JSON array of `{ "name": ..., "duration": ... }`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let assets: Vec<Asset> = serde_json::from_str(json).context("Parse asset catalog")?;
        let (valid, invalid): (Vec<_>, Vec<_>) = assets
            .into_iter()
            .partition(|a| a.duration.is_finite() && a.duration >= 0.0);
        for a in &invalid {
            log::warn!("Skipping asset '{}' with invalid duration {}", a.name, a.duration);
        }
        Ok(Self { assets: valid })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Read asset catalog: {}", path.display()))?;
        let catalog = Self::from_json_str(&json)?;
        log::info!("Loaded {} assets from {}", catalog.assets.len(), path.display());
        Ok(catalog)
    }
}

impl AssetProvider for AssetCatalog {
    fn assets(&self) -> Vec<Asset> {
        self.assets.clone()
    }

    fn find(&self, name: &str) -> Option<Asset> {
        self.assets.iter().find(|a| a.name == name).cloned()
    }
}
