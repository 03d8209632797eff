use crate::error::{AxelError, AxelResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Chart layout and windowing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub axis_min: f32,
    pub axis_max: f32,
    /// Horizontal gridline spacing in value units
    pub step: f32,
    /// Rolling buffer capacity; also the number of horizontal slots
    pub max_points: usize,
    /// Inset from every edge of the view, in px
    pub padding: f32,
    pub vertical_steps: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            axis_min: -1.0,
            axis_max: 1.0,
            step: 0.25,
            max_points: 100,
            padding: 50.0,
            vertical_steps: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// chrono format used for temp file names and the default save name
    pub timestamp_format: String,
    pub file_extension: String,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%d_%H-%M-%S".to_string(),
            file_extension: "csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub mime_type: String,
    /// FileProvider authority declared in the manifest
    pub authority: String,
    pub chooser_title: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            mime_type: "text/csv".to_string(),
            authority: "com.example.axel.provider".to_string(),
            chooser_title: "Send file via".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub group: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            group: "AppSettings".to_string(),
        }
    }
}

/// Application configuration; every field falls back to its default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chart: ChartConfig,
    pub recording: RecordingConfig,
    pub share: ShareConfig,
    pub preferences: PreferencesConfig,
}

impl AppConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> AxelResult<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| AxelError::io(path, e))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> AxelResult<Self> {
        let config: AppConfig =
            serde_json::from_str(raw).map_err(|e| AxelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AxelResult<()> {
        let chart = &self.chart;
        if chart.max_points < 2 {
            return Err(AxelError::Config(format!(
                "chart.max_points must be at least 2, got {}",
                chart.max_points
            )));
        }
        if chart.axis_max <= chart.axis_min {
            return Err(AxelError::Config(format!(
                "chart.axis_max ({}) must exceed chart.axis_min ({})",
                chart.axis_max, chart.axis_min
            )));
        }
        if chart.step <= 0.0 {
            return Err(AxelError::Config("chart.step must be positive".to_string()));
        }
        if chart.vertical_steps == 0 {
            return Err(AxelError::Config(
                "chart.vertical_steps must be positive".to_string(),
            ));
        }
        if self.recording.file_extension.is_empty() {
            return Err(AxelError::Config(
                "recording.file_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{"chart": {"max_points": 50}}"#).unwrap();
        assert_eq!(config.chart.max_points, 50);
        assert_eq!(config.chart.axis_min, -1.0);
        assert_eq!(config.share.mime_type, "text/csv");
        assert_eq!(config.preferences.group, "AppSettings");
    }

    #[test]
    fn test_rejects_inverted_axis() {
        let err = AppConfig::from_json(r#"{"chart": {"axis_min": 1.0, "axis_max": -1.0}}"#);
        assert!(matches!(err, Err(AxelError::Config(_))));
    }

    #[test]
    fn test_rejects_single_slot_chart() {
        let err = AppConfig::from_json(r#"{"chart": {"max_points": 1}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/axel.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
