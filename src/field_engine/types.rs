use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use glam::{Vec2, Vec3};

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#?([a-fA-F\d]{2})([a-fA-F\d]{2})([a-fA-F\d]{2})$")
        .expect("hex color regex");
    static ref SHORT_HEX_COLOR: Regex =
        Regex::new(r"^#([a-fA-F\d])([a-fA-F\d])([a-fA-F\d])$").expect("short hex color regex");
    static ref RGBA_COLOR: Regex = Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([\d.]+)\s*)?\)$"
    )
    .expect("rgba color regex");
}

// ------------------------
// Rgba
// ------------------------

/// Couleur RGBA normalisée (composantes dans `[0, 1]`).
///
/// Se (dé)sérialise depuis une chaîne CSS : `#rrggbb`, `#rgb`, `rgb(r, g, b)`
/// ou `rgba(r, g, b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Construit une couleur depuis un entier `0xRRGGBB`.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Conversion HSL → RGB (teinte, saturation et luminosité dans `[0, 1]`).
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        if s <= 0.0 {
            return Self::new(l, l, l, 1.0);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
            1.0,
        )
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Multiplie l'opacité courante (utilisé pour les fondus basés sur la vie).
    #[inline]
    pub fn scale_alpha(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let channel = |m: Option<regex::Match<'_>>, radix: u32| -> Result<u8, ConfigError> {
            let text = m.map(|m| m.as_str()).unwrap_or("0");
            let text = if radix == 16 && text.len() == 1 {
                text.repeat(2)
            } else {
                text.to_string()
            };
            u8::from_str_radix(&text, radix).map_err(|_| ConfigError::InvalidColor(s.to_string()))
        };

        if let Some(caps) = HEX_COLOR.captures(s) {
            return Ok(Self::from_rgb8(
                channel(caps.get(1), 16)?,
                channel(caps.get(2), 16)?,
                channel(caps.get(3), 16)?,
            ));
        }
        if let Some(caps) = SHORT_HEX_COLOR.captures(s) {
            return Ok(Self::from_rgb8(
                channel(caps.get(1), 16)?,
                channel(caps.get(2), 16)?,
                channel(caps.get(3), 16)?,
            ));
        }
        if let Some(caps) = RGBA_COLOR.captures(s) {
            let base = Self::from_rgb8(
                channel(caps.get(1), 10)?,
                channel(caps.get(2), 10)?,
                channel(caps.get(3), 10)?,
            );
            let alpha = match caps.get(4) {
                Some(m) => m
                    .as_str()
                    .parse::<f32>()
                    .ok()
                    .filter(|a| (0.0..=1.0).contains(a))
                    .ok_or_else(|| ConfigError::InvalidColor(s.to_string()))?,
                None => 1.0,
            };
            return Ok(base.with_alpha(alpha));
        }
        Err(ConfigError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba8();
        write!(f, "rgba({}, {}, {}, {})", r, g, b, self.a)
    }
}

// ------------------------
// ValueRange
// ------------------------

/// Intervalle fermé `[min, max]` utilisé pour tirer tailles, vitesses et opacités.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Intervalle dégénéré `[value, value]`.
    pub const fn fixed(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Vérifie `min <= max`, bornes finies et positives.
    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min < 0.0 {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        if self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Interpolation linéaire, `t` dans `[0, 1]`.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + t * (self.max - self.min)
    }
}
