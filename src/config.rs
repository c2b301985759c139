//! Paths and editor policy settings.
//!
//! `TimelineSettings` lives in `clipline.json` inside the config directory.
//! A missing file means defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "clipline.json";

/// Default log file name inside the data directory.
pub const LOG_FILE: &str = "clipline.log";

/// Environment override for the config directory.
pub const CONFIG_DIR_ENV: &str = "CLIPLINE_CONFIG_DIR";

/// Configuration for overriding default application paths
#[derive(Debug, Clone, Default)]
pub struct PathConfig {
    /// Custom config directory (from CLI or ENV)
    pub config_dir: Option<PathBuf>,
}

impl PathConfig {
    /// Priority: CLI args → ENV var (CLIPLINE_CONFIG_DIR) → None (use defaults)
    pub fn from_env_and_cli(cli_dir: Option<PathBuf>) -> Self {
        let config_dir = cli_dir.or_else(|| std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from));
        Self { config_dir }
    }
}

/// Get path to a configuration file
///
/// Priority:
/// 1. CLI --config-dir argument
/// 2. CLIPLINE_CONFIG_DIR environment variable
/// 3. Current folder if it already holds clipline.json or clipline.log
/// 4. Platform config directory from dirs-next (`~/.config/clipline` on Linux)
pub fn config_file(name: &str, config: &PathConfig) -> PathBuf {
    config_dir(config).join(name)
}

/// Get path to a data file (logs). Same priority as [`config_file`], but the
/// platform fallback is the data directory (`~/.local/share/clipline` on Linux).
pub fn data_file(name: &str, config: &PathConfig) -> PathBuf {
    data_dir(config).join(name)
}

/// Create config and data directories if missing.
pub fn ensure_dirs(config: &PathConfig) -> Result<()> {
    let config_dir = config_dir(config);
    let data_dir = data_dir(config);

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;
    }
    if data_dir != config_dir && !data_dir.exists() {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    }
    Ok(())
}

fn has_local_files(dir: &Path) -> bool {
    [SETTINGS_FILE, LOG_FILE].iter().any(|f| dir.join(f).exists())
}

fn resolve_dir(config: &PathConfig, platform: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = &config.config_dir {
        return dir.clone();
    }
    if let Ok(current_dir) = std::env::current_dir()
        && has_local_files(&current_dir)
    {
        return current_dir;
    }
    platform
        .map(|dir| dir.join("clipline"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn config_dir(config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::config_dir())
}

fn data_dir(config: &PathConfig) -> PathBuf {
    resolve_dir(config, dirs_next::data_dir())
}

/// Editing policy constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Shortest selection (seconds) that may become a cut.
    pub smallest_cut_span: f64,
    /// Normalized distance to a selection edge that grabs the edge instead
    /// of starting a new selection.
    pub edge_proximity: f64,
    /// Visible window width (seconds) at zoom 1.0.
    pub time_span_at_normal_zoom: f64,
    /// Most zoomed-in factor.
    pub zoom_min: f64,
    /// Most zoomed-out factor.
    pub zoom_max: f64,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            smallest_cut_span: 0.03,
            edge_proximity: 0.01,
            time_span_at_normal_zoom: 60.0,
            zoom_min: 0.02,
            zoom_max: 20.0,
        }
    }
}

impl TimelineSettings {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("Failed to write settings: {}", path.display()))
    }

    /// Swap an inverted zoom range and reject non-positive spans.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.zoom_min > self.zoom_max {
            std::mem::swap(&mut self.zoom_min, &mut self.zoom_max);
        }
        if self.zoom_min <= 0.0 {
            log::warn!("zoom_min must be positive, using {}", defaults.zoom_min);
            self.zoom_min = defaults.zoom_min;
            self.zoom_max = self.zoom_max.max(self.zoom_min);
        }
        if self.time_span_at_normal_zoom <= 0.0 {
            log::warn!(
                "time_span_at_normal_zoom must be positive, using {}",
                defaults.time_span_at_normal_zoom
            );
            self.time_span_at_normal_zoom = defaults.time_span_at_normal_zoom;
        }
        self.smallest_cut_span = self.smallest_cut_span.max(0.0);
        self.edge_proximity = self.edge_proximity.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clipline_cfg_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_config_file_with_custom_dir() {
        let config = PathConfig {
            config_dir: Some(PathBuf::from("/custom")),
        };
        assert_eq!(config_file("test.json", &config), PathBuf::from("/custom/test.json"));
        assert_eq!(data_file("clipline.log", &config), PathBuf::from("/custom/clipline.log"));
    }

    #[test]
    fn test_cli_dir_wins() {
        let config = PathConfig::from_env_and_cli(Some(PathBuf::from("/from/cli")));
        assert_eq!(config.config_dir, Some(PathBuf::from("/from/cli")));
    }

    #[test]
    fn test_missing_settings_are_defaults() {
        let path = temp_path("missing.json");
        let settings = TimelineSettings::load(&path).unwrap();
        assert_eq!(settings, TimelineSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let path = temp_path("partial.json");
        fs::write(&path, r#"{ "smallest_cut_span": 0.5 }"#).unwrap();
        let settings = TimelineSettings::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(settings.smallest_cut_span, 0.5);
        assert_eq!(settings.zoom_max, TimelineSettings::default().zoom_max);
    }

    #[test]
    fn test_inverted_zoom_range_is_swapped() {
        let path = temp_path("inverted.json");
        fs::write(&path, r#"{ "zoom_min": 10.0, "zoom_max": 0.5 }"#).unwrap();
        let settings = TimelineSettings::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(settings.zoom_min, 0.5);
        assert_eq!(settings.zoom_max, 10.0);
    }

    #[test]
    fn test_malformed_settings_error() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let result = TimelineSettings::load(&path);
        let _ = fs::remove_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved.json");
        let settings = TimelineSettings {
            edge_proximity: 0.02,
            ..TimelineSettings::default()
        };
        settings.save(&path).unwrap();
        let loaded = TimelineSettings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
