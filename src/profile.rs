//! Serializable collage settings.
//!
//! A [`CollageProfile`] captures everything a session is configured with
//! (layout, canvas size, colors, export label) in a JSON-friendly shape, so
//! a host page can persist or share it.
//!
//! # Example
//!
//! ```
//! use collage_renderer::{CollageProfile, LayoutKind, ThemeSettings};
//!
//! let profile = CollageProfile::new()
//!     .with_layout(LayoutKind::Mosaic)
//!     .with_theme(ThemeSettings {
//!         panel: "#fefce8".into(),
//!         ..ThemeSettings::default()
//!     });
//!
//! let json = profile.to_json().unwrap();
//! let restored = CollageProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::composer::Theme;
use crate::error::{CollageError, Result};
use crate::export::DEFAULT_LABEL;
use crate::layout::{CANVAS_SIZE, LayoutKind};
use crate::photo::SizePx;

// ============================================================================
// Settings
// ============================================================================

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self::from(CANVAS_SIZE)
    }
}

impl From<SizePx> for CanvasSettings {
    fn from(size: SizePx) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl From<CanvasSettings> for SizePx {
    fn from(settings: CanvasSettings) -> Self {
        SizePx::new(settings.width, settings.height)
    }
}

/// Theme colors as `#rrggbb` hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSettings {
    pub background_start: String,
    pub background_end: String,
    pub panel: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::from(&Theme::default())
    }
}

impl From<&Theme> for ThemeSettings {
    fn from(theme: &Theme) -> Self {
        Self {
            background_start: to_hex(theme.background_start),
            background_end: to_hex(theme.background_end),
            panel: to_hex(theme.panel),
        }
    }
}

impl TryFrom<&ThemeSettings> for Theme {
    type Error = CollageError;

    fn try_from(settings: &ThemeSettings) -> Result<Self> {
        Ok(Self {
            background_start: parse_hex(&settings.background_start)?,
            background_end: parse_hex(&settings.background_end)?,
            panel: parse_hex(&settings.panel)?,
        })
    }
}

fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parses `#rgb`, `#rrggbb` or the same without the leading `#`.
fn parse_hex(value: &str) -> Result<Srgb<u8>> {
    value
        .trim()
        .parse::<Srgb<u8>>()
        .map_err(|_| CollageError::InvalidColor {
            value: value.to_owned(),
        })
}

// ============================================================================
// CollageProfile
// ============================================================================

/// Everything a session can be configured with.
///
/// Missing fields fall back to their defaults when deserializing, so `{}`
/// is a valid profile.
///
/// # JSON Format
///
/// ```json
/// {
///   "layout": "main-side",
///   "canvas": { "width": 1200, "height": 800 },
///   "theme": {
///     "backgroundStart": "#f8fafc",
///     "backgroundEnd": "#e2e8f0",
///     "panel": "#ffffff"
///   },
///   "exportLabel": "拼图"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct CollageProfile {
    pub layout: LayoutKind,
    pub canvas: CanvasSettings,
    pub theme: ThemeSettings,
    /// Prefix of export file names.
    pub export_label: String,
}

impl Default for CollageProfile {
    fn default() -> Self {
        Self {
            layout: LayoutKind::default(),
            canvas: CanvasSettings::default(),
            theme: ThemeSettings::default(),
            export_label: DEFAULT_LABEL.to_owned(),
        }
    }
}

impl CollageProfile {
    /// Creates a profile with every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_canvas(mut self, canvas: CanvasSettings) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_theme(mut self, theme: ThemeSettings) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_export_label(mut self, label: impl Into<String>) -> Self {
        self.export_label = label.into();
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
