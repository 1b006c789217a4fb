//! Structured visual style types shared by all controls.

use kurbo::{Affine, Point};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A solid RGBA8 color, opaque unless an alpha is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl SolidColor {
    /// Create an opaque color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with an explicit alpha.
    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::with_alpha(0, 0, 0, 0)
    }

    /// Render as a CSS `rgba(...)` value.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f32::from(self.a) / 255.0
        )
    }
}

/// The fallback when neither a value nor a declared default is available:
/// fully transparent, so the element paints nothing.
impl Default for SolidColor {
    fn default() -> Self {
        Self::transparent()
    }
}

impl From<Color> for SolidColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SolidColor> for Color {
    fn from(color: SolidColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unit of a measurement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelUnit {
    #[default]
    #[serde(rename = "px")]
    Px,
    #[serde(rename = "%")]
    Percent,
}

impl fmt::Display for PixelUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelUnit::Px => f.write_str("px"),
            PixelUnit::Percent => f.write_str("%"),
        }
    }
}

/// A numeric measurement together with its display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: PixelUnit,
}

impl Measurement {
    pub const fn px(value: f64) -> Self {
        Self {
            value,
            unit: PixelUnit::Px,
        }
    }

    pub const fn percent(value: f64) -> Self {
        Self {
            value,
            unit: PixelUnit::Percent,
        }
    }

    /// Resolve against a concrete extent: pixels pass through, percentages
    /// scale the extent.
    pub fn resolve(&self, extent: f64) -> f64 {
        match self.unit {
            PixelUnit::Px => self.value,
            PixelUnit::Percent => extent * self.value / 100.0,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// A rotation about a measurement-resolved origin.
///
/// Declarative form of the host's origin + rotate transform pair; the origin
/// stays relative until the element's box is known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotateTransform {
    pub origin_x: Measurement,
    pub origin_y: Measurement,
    pub angle_deg: f64,
}

impl RotateTransform {
    /// Rotation about the element's visual center (50%, 50%).
    pub fn about_center(angle_deg: f64) -> Self {
        Self {
            origin_x: Measurement::percent(50.0),
            origin_y: Measurement::percent(50.0),
            angle_deg,
        }
    }

    /// Resolve into an affine for a concrete element box.
    pub fn to_affine(&self, width: f64, height: f64) -> Affine {
        let origin = Point::new(self.origin_x.resolve(width), self.origin_y.resolve(height));
        Affine::rotate_about(self.angle_deg.to_radians(), origin)
    }
}
