//! Project document: the saved/exchanged form of a timeline.
//!
//! ```json
//! { "clips": [ { "name": "a.mp4", "duration": 10 } ],
//!   "cutSpans": [ { "clipIndex": 0, "inpoint": 2, "outpoint": 4, "apparentStart": 2 } ] }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::clip::Clip;
use super::cut::CutSpan;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDoc {
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub cut_spans: Vec<CutSpan>,
}

impl ProjectDoc {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Parse project")
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Serialize project")
    }

    /// Write pretty JSON; a missing or foreign extension becomes `.json`.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let path = if path.extension().and_then(|s| s.to_str()) != Some("json") {
            path.with_extension("json")
        } else {
            path.to_path_buf()
        };
        fs::write(&path, self.to_json_string()?)
            .with_context(|| format!("Write project: {}", path.display()))?;
        log::info!("Saved project to {}", path.display());
        Ok(())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Read project: {}", path.display()))?;
        let doc = Self::from_json_str(&json)?;
        log::info!(
            "Loaded project {} ({} clips, {} cuts)",
            path.display(),
            doc.clips.len(),
            doc.cut_spans.len()
        );
        Ok(doc)
    }
}
