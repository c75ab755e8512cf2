//! Persisted user settings.
//!
//! Stored as JSON in the user config directory. Every field has a default,
//! so a missing or partial file always loads. Paths like
//! `estimate.contingency_percent` address individual settings for the
//! config CLI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Estimation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateSettings {
    /// Contingency buffer applied to the subtotal, in percent.
    pub contingency_percent: f64,
    /// Stud spacing, inches on center.
    pub stud_spacing_in: f64,
    /// Roof pitch as rise over 12" run.
    pub roof_pitch: f64,
    /// Builder-standard ceiling R-value before code adjustment.
    pub default_ceiling_r: u32,
    /// Builder-standard wall R-value before code adjustment.
    pub default_wall_r: u32,
    /// Unit price used when a material has no catalog entry.
    pub fallback_unit_price: f64,
    /// Hourly rate used when a trade has no labor entry.
    pub fallback_hourly_rate: f64,
}

impl Default for EstimateSettings {
    fn default() -> Self {
        Self {
            contingency_percent: 10.0,
            stud_spacing_in: 16.0,
            roof_pitch: 6.0,
            default_ceiling_r: 30,
            default_wall_r: 13,
            fallback_unit_price: 25.0,
            fallback_hourly_rate: 45.0,
        }
    }
}

/// Vision API knobs. The API key itself comes from the environment, never
/// from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Photos accepted per analysis batch.
    pub max_photos: usize,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 120,
            max_photos: 8,
        }
    }
}

/// Database knobs. The connection URL comes from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub pool_size: usize,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self { pool_size: 8 }
    }
}

/// All persisted settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub estimate: EstimateSettings,
    pub vision: VisionSettings,
    pub database: DatabaseSettings,
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("groundwork")
            .join("settings.json")
    }

    /// Load from the default path, falling back to defaults if the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        match Self::load_from(&Self::default_path()) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(e) => {
                tracing::warn!("failed to load settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save to the default path, creating the directory if needed.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get a setting by path.
    pub fn get(&self, path: &str) -> Option<String> {
        let value = match path {
            "estimate.contingency_percent" => self.estimate.contingency_percent.to_string(),
            "estimate.stud_spacing_in" => self.estimate.stud_spacing_in.to_string(),
            "estimate.roof_pitch" => self.estimate.roof_pitch.to_string(),
            "estimate.default_ceiling_r" => self.estimate.default_ceiling_r.to_string(),
            "estimate.default_wall_r" => self.estimate.default_wall_r.to_string(),
            "estimate.fallback_unit_price" => self.estimate.fallback_unit_price.to_string(),
            "estimate.fallback_hourly_rate" => self.estimate.fallback_hourly_rate.to_string(),
            "vision.model" => self.vision.model.clone(),
            "vision.base_url" => self.vision.base_url.clone(),
            "vision.timeout_secs" => self.vision.timeout_secs.to_string(),
            "vision.max_photos" => self.vision.max_photos.to_string(),
            "database.pool_size" => self.database.pool_size.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a setting by path, parsing the value for its type.
    pub fn set(&mut self, path: &str, value: &str) -> Result<(), SettingsError> {
        fn parse<T: std::str::FromStr>(path: &str, value: &str) -> Result<T, SettingsError> {
            value.parse().map_err(|_| SettingsError::InvalidValue {
                path: path.to_string(),
                value: value.to_string(),
            })
        }

        match path {
            "estimate.contingency_percent" => {
                self.estimate.contingency_percent = parse(path, value)?;
            }
            "estimate.stud_spacing_in" => self.estimate.stud_spacing_in = parse(path, value)?,
            "estimate.roof_pitch" => self.estimate.roof_pitch = parse(path, value)?,
            "estimate.default_ceiling_r" => self.estimate.default_ceiling_r = parse(path, value)?,
            "estimate.default_wall_r" => self.estimate.default_wall_r = parse(path, value)?,
            "estimate.fallback_unit_price" => {
                self.estimate.fallback_unit_price = parse(path, value)?;
            }
            "estimate.fallback_hourly_rate" => {
                self.estimate.fallback_hourly_rate = parse(path, value)?;
            }
            "vision.model" => self.vision.model = value.to_string(),
            "vision.base_url" => self.vision.base_url = value.to_string(),
            "vision.timeout_secs" => self.vision.timeout_secs = parse(path, value)?,
            "vision.max_photos" => self.vision.max_photos = parse(path, value)?,
            "database.pool_size" => self.database.pool_size = parse(path, value)?,
            _ => {
                return Err(SettingsError::UnknownPath {
                    path: path.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Reset a setting to its default value.
    pub fn reset(&mut self, path: &str) -> Result<(), SettingsError> {
        let defaults = Settings::default();
        let default_value = defaults.get(path).ok_or_else(|| SettingsError::UnknownPath {
            path: path.to_string(),
        })?;
        self.set(path, &default_value)
    }

    /// All settings as (path, value) pairs, in display order.
    pub fn list(&self) -> Vec<(String, String)> {
        const PATHS: [&str; 12] = [
            "estimate.contingency_percent",
            "estimate.stud_spacing_in",
            "estimate.roof_pitch",
            "estimate.default_ceiling_r",
            "estimate.default_wall_r",
            "estimate.fallback_unit_price",
            "estimate.fallback_hourly_rate",
            "vision.model",
            "vision.base_url",
            "vision.timeout_secs",
            "vision.max_photos",
            "database.pool_size",
        ];
        PATHS
            .iter()
            .filter_map(|p| self.get(p).map(|v| (p.to_string(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.estimate.contingency_percent, 10.0);
        assert_eq!(settings.estimate.stud_spacing_in, 16.0);
        assert_eq!(settings.vision.model, "gpt-4o");
    }

    #[test]
    fn test_get_set_reset_round_trip() {
        let mut settings = Settings::default();

        settings.set("estimate.contingency_percent", "12.5").unwrap();
        assert_eq!(
            settings.get("estimate.contingency_percent").as_deref(),
            Some("12.5")
        );

        settings.reset("estimate.contingency_percent").unwrap();
        assert_eq!(settings.estimate.contingency_percent, 10.0);
    }

    #[test]
    fn test_unknown_path_and_bad_value_are_typed() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set("estimate.nope", "1"),
            Err(SettingsError::UnknownPath { .. })
        ));
        assert!(matches!(
            settings.set("estimate.roof_pitch", "steep"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(settings.get("estimate.nope").is_none());
    }

    #[test]
    fn test_list_covers_every_path() {
        let settings = Settings::default();
        let list = settings.list();
        assert_eq!(list.len(), 12);
        for (path, _) in &list {
            assert!(settings.get(path).is_some(), "{path} missing");
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.set("vision.model", "gpt-4o-mini").unwrap();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.vision.model, "gpt-4o-mini");
        assert_eq!(loaded.estimate.contingency_percent, 10.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"estimate": {"roof_pitch": 8.0}}"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.estimate.roof_pitch, 8.0);
        assert_eq!(loaded.estimate.stud_spacing_in, 16.0);
        assert_eq!(loaded.database.pool_size, 8);
    }
}
