#![forbid(unsafe_code)]

//! Overlay configuration.
//!
//! [`SheetConfig`] carries the tunables that are not per-presentation:
//! scrim colour, capture background, and the capture-size ceiling. With
//! the `policy-config` feature it can be loaded from TOML:
//!
//! ```toml
//! scrim = "#00000052"
//! capture_background = "#FFFFFFFF"
//! max_capture_pixels = 16777216
//! snapshot_enabled = true
//!
//! [properties]
//! dismiss_on_outside_tap = false
//! secure_policy = "force-on"
//! ```
//!
//! Unknown keys are rejected. Missing keys keep their defaults.

use core::fmt;

use sheet_core::OverlayProperties;
use sheet_render::PackedRgba;

/// Default opaque end of the scrim interpolation (black at ~32% alpha).
pub const DEFAULT_SCRIM: PackedRgba = PackedRgba::rgba(0, 0, 0, 0x52);

/// Default capture-size ceiling in pixels (4096 x 4096).
pub const DEFAULT_MAX_CAPTURE_PIXELS: u64 = 16_777_216;

/// Errors from configuration loading and validation.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The document is not valid TOML or has unknown/ill-typed keys.
    Parse(String),
    /// A value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read sheet config: {err}"),
            Self::Parse(msg) => write!(f, "failed to parse sheet config: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid sheet config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Host-wide overlay configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetConfig {
    /// Scrim colour at full presence.
    pub scrim: PackedRgba,
    /// Background that captured content is flattened onto.
    pub capture_background: PackedRgba,
    /// Largest capture, in pixels, before falling back to the live container.
    pub max_capture_pixels: u64,
    /// Whether exit transitions use a captured snapshot at all.
    pub snapshot_enabled: bool,
    /// Properties used when a caller does not supply its own.
    pub default_properties: OverlayProperties,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            scrim: DEFAULT_SCRIM,
            capture_background: PackedRgba::WHITE,
            max_capture_pixels: DEFAULT_MAX_CAPTURE_PIXELS,
            snapshot_enabled: true,
            default_properties: OverlayProperties::default(),
        }
    }
}

impl SheetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scrim(mut self, scrim: PackedRgba) -> Self {
        self.scrim = scrim;
        self
    }

    #[must_use]
    pub fn capture_background(mut self, background: PackedRgba) -> Self {
        self.capture_background = background;
        self
    }

    #[must_use]
    pub fn max_capture_pixels(mut self, pixels: u64) -> Self {
        self.max_capture_pixels = pixels;
        self
    }

    #[must_use]
    pub fn snapshot_enabled(mut self, enabled: bool) -> Self {
        self.snapshot_enabled = enabled;
        self
    }

    #[must_use]
    pub fn default_properties(mut self, properties: OverlayProperties) -> Self {
        self.default_properties = properties;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_capture_pixels == 0 {
            return Err(ConfigError::Invalid(
                "max_capture_pixels must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "policy-config")]
mod file {
    use std::path::Path;

    use serde::Deserialize;
    use sheet_core::OverlayProperties;
    use sheet_render::PackedRgba;

    use super::{ConfigError, SheetConfig};

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct RawConfig {
        scrim: Option<String>,
        capture_background: Option<String>,
        max_capture_pixels: Option<u64>,
        snapshot_enabled: Option<bool>,
        properties: Option<OverlayProperties>,
    }

    fn parse_color(field: &str, value: &str) -> Result<PackedRgba, ConfigError> {
        PackedRgba::from_hex(value)
            .ok_or_else(|| ConfigError::Invalid(format!("{field}: '{value}' is not a hex colour")))
    }

    impl SheetConfig {
        /// Parse a TOML document. Missing keys keep their defaults.
        pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
            let raw: RawConfig =
                toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;

            let mut config = SheetConfig::default();
            if let Some(scrim) = raw.scrim.as_deref() {
                config.scrim = parse_color("scrim", scrim)?;
            }
            if let Some(background) = raw.capture_background.as_deref() {
                config.capture_background = parse_color("capture_background", background)?;
            }
            if let Some(pixels) = raw.max_capture_pixels {
                config.max_capture_pixels = pixels;
            }
            if let Some(enabled) = raw.snapshot_enabled {
                config.snapshot_enabled = enabled;
            }
            if let Some(properties) = raw.properties {
                config.default_properties = properties;
            }
            config.validate()?;

            tracing::debug!(
                scrim = %config.scrim.to_hex(),
                max_capture_pixels = config.max_capture_pixels,
                snapshot_enabled = config.snapshot_enabled,
                "sheet config parsed"
            );
            Ok(config)
        }

        /// Read and parse a TOML file.
        pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let source = std::fs::read_to_string(path.as_ref())?;
            Self::from_toml_str(&source)
        }
    }
}
