use palette::{LinSrgb, Srgb};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGB color, written as `#RRGGBB` in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Named colors cycled through by the viewer.
pub const PRESETS: &[(&str, RgbColor)] = &[
    ("black", RgbColor::new(0x00, 0x00, 0x00)),
    ("white", RgbColor::new(0xFF, 0xFF, 0xFF)),
    ("red", RgbColor::new(0xFF, 0x00, 0x00)),
    ("green", RgbColor::new(0x00, 0x80, 0x00)),
    ("blue", RgbColor::new(0x00, 0x00, 0xFF)),
    ("goldenrod", RgbColor::new(0xDA, 0xA5, 0x20)),
    ("magenta", RgbColor::new(0xFF, 0x00, 0xFF)),
];

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor::new(0x00, 0x00, 0x00);
    pub const WHITE: RgbColor = RgbColor::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from hex string like "#FF0000" or "FF0000"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// The preset following this color, or the first preset for custom colors.
    pub fn next_preset(&self) -> Self {
        let current = PRESETS.iter().position(|(_, c)| c == self);
        match current {
            Some(i) => PRESETS[(i + 1) % PRESETS.len()].1,
            None => PRESETS[0].1,
        }
    }

    /// Preset name, if this color is one of the presets.
    pub fn preset_name(&self) -> Option<&'static str> {
        PRESETS.iter().find(|(_, c)| c == self).map(|(name, _)| *name)
    }

    /// Interpolate toward `other` in linear light; `t = 0` keeps `self`.
    pub fn blend(&self, other: RgbColor, t: f32) -> RgbColor {
        let t = t.clamp(0.0, 1.0);
        let a: LinSrgb = Srgb::<u8>::new(self.r, self.g, self.b).into_format::<f32>().into_linear();
        let b: LinSrgb = Srgb::<u8>::new(other.r, other.g, other.b).into_format::<f32>().into_linear();
        let mixed = LinSrgb::new(
            a.red + (b.red - a.red) * t,
            a.green + (b.green - a.green) * t,
            a.blue + (b.blue - a.blue) * t,
        );
        let out: Srgb = Srgb::from_linear(mixed);
        let out: Srgb<u8> = out.into_format();
        RgbColor::new(out.red, out.green, out.blue)
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for RgbColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, color)) = PRESETS.iter().find(|(name, _)| name.eq_ignore_ascii_case(s.trim())) {
            return Ok(*color);
        }
        RgbColor::from_hex(s).ok_or_else(|| format!("Invalid color '{}': expected #RRGGBB or a preset name", s))
    }
}

impl Serialize for RgbColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RgbColor::from_str(&s).map_err(serde::de::Error::custom)
    }
}
