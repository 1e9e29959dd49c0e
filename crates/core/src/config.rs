//! Planner configuration
//!
//! Tunable constants for seat geometry, element sizing, auto-arrangement and
//! capacity estimation. Loaded from `seatwise.toml`; every field has a default
//! so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlannerConfig {
    pub geometry: GeometryConfig,
    pub sizes: SizeConfig,
    pub layout: LayoutConfig,
    pub capacity: CapacityConfig,
}

/// Seat placement constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Half the width of a seat glyph; offsets are shifted by this so the glyph centers on its point
    pub seat_glyph_half: f64,
    /// Gap between a round table's edge and its seat ring, at reference size
    pub circle_clearance: f64,
    /// Table size the circle clearance is calibrated for
    pub reference_size: f64,
    /// Distance of top/left seats from the element edge
    pub edge_clearance: f64,
    /// Distance of bottom/right seats from the element edge
    pub edge_gap: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            seat_glyph_half: 12.0,
            circle_clearance: 25.0,
            reference_size: 120.0,
            edge_clearance: 30.0,
            edge_gap: 6.0,
        }
    }
}

/// Element sizing limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    pub min_size: f64,
    pub max_size: f64,
    /// Largest quantity a single batch add may create
    pub max_batch: u32,
    pub default_seats: u32,
    /// Seats per booth when none is given
    pub default_booth_seats: u32,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            min_size: 20.0,
            max_size: 500.0,
            max_batch: 50,
            default_seats: 6,
            default_booth_seats: 1,
        }
    }
}

impl SizeConfig {
    /// Clamp a width or height into the allowed range
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min_size;
        }
        value.clamp(self.min_size, self.max_size)
    }
}

/// Auto-arrangement and default placement constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance kept clear along every room edge
    pub margin: f64,
    /// Added to element width to get the horizontal safety footprint
    pub safety_extra_width: f64,
    /// Added to element height to get the vertical safety footprint
    pub safety_extra_height: f64,
    /// Horizontal seat clearance checked against the margin
    pub bound_pad_x: f64,
    /// Vertical seat clearance checked against the margin
    pub bound_pad_y: f64,
    /// Columns of the default grid new elements are dropped onto
    pub grid_columns: u32,
    pub grid_pitch: f64,
    pub grid_origin: f64,
    /// Where new decor components appear
    pub decor_origin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 100.0,
            safety_extra_width: 80.0,
            safety_extra_height: 120.0,
            bound_pad_x: 40.0,
            bound_pad_y: 60.0,
            grid_columns: 4,
            grid_pitch: 250.0,
            grid_origin: 100.0,
            decor_origin: 100.0,
        }
    }
}

/// Capacity estimate constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityConfig {
    pub spacing_factor: f64,
    pub seats_per_element: u32,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            spacing_factor: 1.5,
            seats_per_element: 6,
        }
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl PlannerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> String {
        // All fields are plain numbers and tables, serialization cannot fail
        toml::to_string_pretty(self).unwrap_or_default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sizes.min_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "sizes.min_size",
                reason: "must be positive".into(),
            });
        }
        if self.sizes.max_size < self.sizes.min_size {
            return Err(ConfigError::Invalid {
                field: "sizes.max_size",
                reason: format!("must be at least min_size ({})", self.sizes.min_size),
            });
        }
        if self.sizes.max_batch == 0 {
            return Err(ConfigError::Invalid {
                field: "sizes.max_batch",
                reason: "must be at least 1".into(),
            });
        }
        if self.geometry.reference_size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "geometry.reference_size",
                reason: "must be positive".into(),
            });
        }
        if self.layout.grid_columns == 0 {
            return Err(ConfigError::Invalid {
                field: "layout.grid_columns",
                reason: "must be at least 1".into(),
            });
        }

        let layout = &self.layout;
        let positive = [
            ("layout.safety_extra_width", layout.safety_extra_width),
            ("layout.safety_extra_height", layout.safety_extra_height),
            ("capacity.spacing_factor", self.capacity.spacing_factor),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| !(*value > 0.0)) {
            return Err(ConfigError::Invalid {
                field: *field,
                reason: "must be positive".into(),
            });
        }
        let non_negative = [
            ("layout.margin", layout.margin),
            ("layout.bound_pad_x", layout.bound_pad_x),
            ("layout.bound_pad_y", layout.bound_pad_y),
        ];
        if let Some((field, _)) = non_negative.iter().find(|(_, value)| !(*value >= 0.0)) {
            return Err(ConfigError::Invalid {
                field: *field,
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Default config file location (`<config dir>/seatwise.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "seatwise", "seatwise")
        .map(|dirs| dirs.config_dir().join("seatwise.toml"))
}
