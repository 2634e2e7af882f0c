use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Radial tessellation the renderer should use for round shapes.
pub const ROUND_SEGMENTS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Box,
    Cylinder,
    Ellipsoid,
    Sphere,
}

/// An RGB color packed as `0xRRGGBB`.
///
/// Accepts either a JSON number or a string in decimal, `0x`-prefixed or
/// `#`-prefixed hexadecimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "u32")]
pub struct Color(pub u32);

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Number(f64),
    Text(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Number(n) => {
                if n.is_finite() && n >= 0.0 && n <= f64::from(u32::MAX) {
                    Ok(Color(n as u32))
                } else {
                    Err(format!("color {n} is out of range"))
                }
            }
            ColorRepr::Text(text) => parse_color_text(&text),
        }
    }
}

fn parse_color_text(text: &str) -> Result<Color, String> {
    let trimmed = text.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'))
    {
        u32::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u32>()
    };
    parsed
        .map(Color)
        .map_err(|e| format!("invalid color '{text}': {e}"))
}

/// One primitive shape of a group, as written in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSpec {
    #[serde(rename = "type")]
    pub kind: PrimitiveKind,
    #[serde(default)]
    pub scale: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f32>,
    #[serde(default)]
    pub color: Color,
}

/// Resolved geometry parameters handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Box {
        size: Vec3,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    /// A sphere stretched per axis; `radii` are the semi-axes.
    Ellipsoid {
        radii: Vec3,
        segments: u32,
    },
    /// `radius` is half the log's `diameter`; renderers must not halve it again.
    Sphere {
        radius: f32,
        segments: u32,
    },
}

impl PrimitiveSpec {
    /// Resolves the raw dimensions into concrete geometry parameters.
    pub fn shape(&self) -> Result<Shape, String> {
        match self.kind {
            PrimitiveKind::Box => {
                let [x, y, z] = self.extents()?;
                Ok(Shape::Box {
                    size: Vec3::new(x, y, z),
                })
            }
            PrimitiveKind::Cylinder => {
                let [radius_top, radius_bottom, height] = self.extents()?;
                Ok(Shape::Cylinder {
                    radius_top,
                    radius_bottom,
                    height,
                    radial_segments: ROUND_SEGMENTS,
                })
            }
            PrimitiveKind::Ellipsoid => {
                let [x, y, z] = self.extents()?;
                if x <= 0.0 {
                    return Err("ellipsoid needs a positive first scale".to_string());
                }
                Ok(Shape::Ellipsoid {
                    radii: Vec3::new(x, y, z) * 0.5,
                    segments: ROUND_SEGMENTS,
                })
            }
            PrimitiveKind::Sphere => {
                let diameter = self
                    .diameter
                    .or_else(|| self.scale.first().copied())
                    .ok_or_else(|| "sphere needs a diameter".to_string())?;
                if !diameter.is_finite() || diameter <= 0.0 {
                    return Err(format!("sphere diameter {diameter} must be positive"));
                }
                Ok(Shape::Sphere {
                    radius: diameter * 0.5,
                    segments: ROUND_SEGMENTS,
                })
            }
        }
    }

    fn extents(&self) -> Result<[f32; 3], String> {
        match self.scale.as_slice() {
            &[x, y, z] if [x, y, z].iter().all(|v| v.is_finite() && *v >= 0.0) => Ok([x, y, z]),
            &[_, _, _] => Err(format!("{} scale must be finite and non-negative", self.kind)),
            other => Err(format!(
                "{} needs 3 scale values, found {}",
                self.kind,
                other.len()
            )),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Box => "box",
            Self::Cylinder => "cylinder",
            Self::Ellipsoid => "ellipsoid",
            Self::Sphere => "sphere",
        };
        f.write_str(name)
    }
}
