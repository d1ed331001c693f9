//! Chart configuration
//!
//! Built-in defaults reproduce the reference look: a one second base
//! duration, 7px markers growing to 15px on focus, 20px margins. Any subset
//! of fields can be overridden from a TOML file:
//!
//! ```toml
//! duration_ms = 600
//! overview_width = 1200
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Base duration `D` for every transition, in milliseconds
    pub duration_ms: f64,
    /// Per-index delay for the overview entrance; negative leads
    pub stagger_ms: f64,
    pub margin: f64,
    pub overview_width: f64,
    pub overview_height: f64,
    /// Inner and outer padding of the artist bands, as a fraction of a step
    pub band_padding: f64,
    pub detail_width: f64,
    pub detail_height: f64,
    pub marker_radius: f64,
    pub focus_radius: f64,
    /// Tooltip position relative to the pointer
    pub tooltip_offset: (f64, f64),
    pub hover_fill: String,
    pub base_fill: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            stagger_ms: -2.0,
            margin: 20.0,
            overview_width: 960.0,
            overview_height: 5000.0,
            band_padding: 0.25,
            detail_width: 540.0,
            detail_height: 250.0,
            marker_radius: 7.0,
            focus_radius: 15.0,
            tooltip_offset: (20.0, 0.0),
            hover_fill: "grey".to_string(),
            base_fill: "black".to_string(),
        }
    }
}

impl ChartConfig {
    /// Read overrides from a TOML file on top of the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        info!(path = %path.display(), "loaded chart configuration");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: ChartConfig =
            toml::from_str(text).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.duration_ms > 0.0) {
            return Err(Error::Config("duration_ms must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&self.band_padding) {
            return Err(Error::Config("band_padding must be in [0, 1)".to_string()));
        }
        if self.overview_width <= 2.0 * self.margin || self.detail_width <= 3.0 * self.margin {
            return Err(Error::Config("chart width leaves no room inside the margins".to_string()));
        }
        Ok(())
    }

    /// A quarter of the base duration, used for highlight and focus
    pub fn quick_ms(&self) -> f64 {
        self.duration_ms / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = ChartConfig::default();
        assert_eq!(c.duration_ms, 1000.0);
        assert_eq!(c.quick_ms(), 250.0);
        assert_eq!(c.marker_radius, 7.0);
        assert_eq!(c.focus_radius, 15.0);
    }

    #[test]
    fn test_partial_override() {
        let c = ChartConfig::from_toml("duration_ms = 400\nhover_fill = \"red\"\n").unwrap();
        assert_eq!(c.duration_ms, 400.0);
        assert_eq!(c.hover_fill, "red");
        assert_eq!(c.margin, 20.0);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ChartConfig::from_toml("duration_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert!(ChartConfig::from_toml("duration_ms = 0").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.toml");
        std::fs::write(&path, "focus_radius = 20\n").unwrap();
        assert_eq!(ChartConfig::load(&path).unwrap().focus_radius, 20.0);
        assert!(ChartConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
