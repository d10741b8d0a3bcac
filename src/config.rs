use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::color::RgbColor;
use crate::curve::{CurveFamily, CurveParams};
use crate::display::DisplayMode;
use crate::error::ConfigError;
use crate::render::{Camera, RenderStyle, ViewMode};

pub const N_RANGE: (u32, u32) = (1, 100);
pub const D_RANGE: (u32, u32) = (1, 100);
pub const POINT_SIZE_RANGE: (f32, f32) = (1.0, 5.0);
pub const CANVAS_RANGE: (u16, u16) = (100, 1000);
pub const STEP_RANGE: (f64, f64) = (1e-4, 1.0);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub curve: CurveConfig,
    pub view: ViewConfig,
    pub style: StyleConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    pub family: CurveFamily,
    pub n: u32,
    pub d: u32,
    /// Angular step; the family default when unset
    pub step: Option<f64>,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            family: CurveFamily::Rose,
            n: 3,
            d: 26,
            step: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub mode: ViewMode,
    pub yaw: f64,
    pub pitch: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            mode: ViewMode::TwoD,
            yaw: camera.yaw,
            pitch: camera.pitch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub point_size: f32,
    pub color: RgbColor,
    pub background_color: RgbColor,
    pub width: u16,
    pub height: u16,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            point_size: style.point_size,
            color: style.color,
            background_color: style.background_color,
            width: style.width,
            height: style.height,
        }
    }
}

fn check_range<T: Into<f64> + PartialOrd + Copy>(
    field: &'static str,
    value: T,
    (min, max): (T, T),
) -> Result<(), ConfigError> {
    // NaN is outside every range.
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value: value.into(),
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(())
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the default XDG config path (~/.config/rosette/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rosette").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists.
    /// Returns None if the file is missing; logs a warning on parse errors.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("{:#}; using defaults", anyhow::Error::from(e));
                None
            }
        }
    }

    /// Write the commented template to the default path and return that path.
    pub fn init_default_config() -> anyhow::Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r##"# Rosette Configuration
# This file is auto-generated. Edit as needed.

[display]
# Output: "terminal" (interactive) or "csv" (dump the dataset)
mode = "terminal"

[curve]
# Curve family: "rose", "rose-even-adjusted", "limacon-trisectrix"
family = "rose"
# Frequency ratio k = n / d (each 1-100)
n = 3
d = 26
# Angular sampling step in radians, 0.0001-1.0 (omit for the family default)
# step = 0.002

[view]
# Projection: "2d" or "3d" (angle as depth)
mode = "2d"
# 3D camera angles in radians
yaw = 0.8
pitch = 0.5

[style]
# Point diameter in braille dots (1.0-5.0)
point_size = 1.0
# Colors as hex or a preset name
# (black, white, red, green, blue, goldenrod, magenta)
color = "#000000"
background_color = "#FFFFFF"
# Plot size in braille dots (100-1000), clamped to the terminal
width = 1000
height = 1000
"##
        .to_string()
    }

    /// Store the curve, view and style settings in the file at `path`,
    /// creating it from the template first if needed. Comments and layout
    /// of an existing file are kept.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, Self::generate_config_template())?;
            info!("Created config file at {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config for save: {}", path.display()))?;
        let updated = self.apply_to_document(&content)?;
        std::fs::write(path, updated)?;
        Ok(())
    }

    /// Rewrite the persisted settings inside a TOML document.
    pub fn apply_to_document(&self, content: &str) -> anyhow::Result<String> {
        let mut doc = content
            .parse::<toml_edit::DocumentMut>()
            .context("Failed to parse config for save")?;

        for section in ["curve", "view", "style"] {
            if !doc.contains_key(section) {
                doc[section] = toml_edit::table();
            }
        }

        doc["curve"]["family"] = toml_edit::value(self.curve.family.name());
        doc["curve"]["n"] = toml_edit::value(i64::from(self.curve.n));
        doc["curve"]["d"] = toml_edit::value(i64::from(self.curve.d));
        if let Some(step) = self.curve.step {
            doc["curve"]["step"] = toml_edit::value(step);
        }

        doc["view"]["mode"] = toml_edit::value(self.view.mode.name());
        doc["view"]["yaw"] = toml_edit::value(self.view.yaw);
        doc["view"]["pitch"] = toml_edit::value(self.view.pitch);

        doc["style"]["point_size"] = toml_edit::value(f64::from(self.style.point_size));
        doc["style"]["color"] = toml_edit::value(self.style.color.to_string());
        doc["style"]["background_color"] = toml_edit::value(self.style.background_color.to_string());
        doc["style"]["width"] = toml_edit::value(i64::from(self.style.width));
        doc["style"]["height"] = toml_edit::value(i64::from(self.style.height));

        Ok(doc.to_string())
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }

        if let Some(family) = args.family {
            self.curve.family = family;
        }
        if let Some(n) = args.n {
            self.curve.n = n;
        }
        if let Some(d) = args.d {
            self.curve.d = d;
        }
        if let Some(step) = args.step {
            self.curve.step = Some(step);
        }

        if let Some(view) = args.view {
            self.view.mode = view;
        }

        if let Some(size) = args.point_size {
            self.style.point_size = size;
        }
        if let Some(color) = args.color {
            self.style.color = color;
        }
        if let Some(color) = args.background_color {
            self.style.background_color = color;
        }
        if let Some(width) = args.width {
            self.style.width = width;
        }
        if let Some(height) = args.height {
            self.style.height = height;
        }
    }

    /// Reject values outside the ranges the controls allow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("curve.n", self.curve.n, N_RANGE)?;
        check_range("curve.d", self.curve.d, D_RANGE)?;
        if let Some(step) = self.curve.step {
            check_range("curve.step", step, STEP_RANGE)?;
        }
        check_range("style.point_size", self.style.point_size, POINT_SIZE_RANGE)?;
        check_range("style.width", self.style.width, CANVAS_RANGE)?;
        check_range("style.height", self.style.height, CANVAS_RANGE)?;
        Ok(())
    }

    pub fn curve_params(&self) -> CurveParams {
        let params = CurveParams::new(self.curve.family, self.curve.n, self.curve.d);
        match self.curve.step {
            Some(step) => params.with_step(step),
            None => params,
        }
    }

    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            color: self.style.color,
            background_color: self.style.background_color,
            point_size: self.style.point_size,
            width: self.style.width,
            height: self.style.height,
        }
    }

    pub fn camera(&self) -> Camera {
        Camera {
            yaw: self.view.yaw,
            pitch: self.view.pitch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Args;
    use clap::Parser;

    #[test]
    fn template_parses_to_defaults() {
        let parsed: Config = toml::from_str(&Config::generate_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
        let params = Config::default().curve_params();
        assert_eq!(params, CurveParams::new(CurveFamily::Rose, 3, 26));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r##"
            [curve]
            family = "limacon-trisectrix"
            step = 0.01

            [style]
            color = "goldenrod"
            "##,
        )
        .unwrap();
        assert_eq!(config.curve.family, CurveFamily::LimaconTrisectrix);
        assert_eq!(config.curve.n, 3);
        assert_eq!(config.curve_params().step, 0.01);
        assert_eq!(config.style.color, RgbColor::new(0xDA, 0xA5, 0x20));
        assert_eq!(config.view.mode, ViewMode::TwoD);
    }

    #[test]
    fn bad_color_fails_to_parse() {
        let result: Result<Config, _> = toml::from_str("[style]\ncolor = \"#12\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut config = Config::default();
        config.curve.d = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { field: "curve.d", .. }));

        let mut config = Config::default();
        config.style.point_size = 5.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "style.point_size", .. })
        ));

        let mut config = Config::default();
        config.style.width = 99;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unusable_steps_are_rejected() {
        for step in [1e-300, 1e-9, 0.0, -0.002, 2.0, f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.curve.step = Some(step);
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::OutOfRange { field: "curve.step", .. })
                ),
                "step {} was accepted",
                step
            );
        }

        let mut config = Config::default();
        config.curve.d = D_RANGE.1;
        config.curve.step = Some(STEP_RANGE.0);
        config.validate().unwrap();
        let count = crate::curve::sampler::sample_count(D_RANGE.1, STEP_RANGE.0);
        assert!(count <= crate::curve::sampler::MAX_SAMPLES);
    }

    #[test]
    fn tiny_cli_step_fails_validation() {
        let args = Args::parse_from(["rosette", "--step", "1e-300"]);
        let mut config = Config::default();
        config.merge_args(&args);
        assert!(config.validate().is_err());
    }

    #[test]
    fn cli_overrides_file_values() {
        let args = Args::parse_from([
            "rosette",
            "--family",
            "rose-even-adjusted",
            "-n",
            "4",
            "-d",
            "2",
            "--view",
            "3d",
            "--color",
            "#FF0000",
            "--point-size",
            "2.5",
            "--mode",
            "csv",
        ]);
        let mut config = Config::default();
        config.merge_args(&args);

        assert_eq!(config.display.mode, DisplayMode::Csv);
        assert_eq!(config.curve.family, CurveFamily::RoseEvenAdjusted);
        assert_eq!((config.curve.n, config.curve.d), (4, 2));
        assert_eq!(config.view.mode, ViewMode::ThreeD);
        assert_eq!(config.style.color, RgbColor::new(255, 0, 0));
        assert_eq!(config.style.point_size, 2.5);
        assert_eq!(config.style.background_color, RgbColor::WHITE);
        assert_eq!(config.curve_params().step, 0.001);
    }

    #[test]
    fn saving_keeps_comments_and_round_trips() {
        let mut config = Config::default();
        config.curve.family = CurveFamily::LimaconTrisectrix;
        config.curve.n = 7;
        config.view.mode = ViewMode::ThreeD;
        config.view.yaw = 1.25;
        config.style.point_size = 2.5;
        config.style.color = RgbColor::new(0xDA, 0xA5, 0x20);

        let updated = config
            .apply_to_document(&Config::generate_config_template())
            .unwrap();
        assert!(updated.contains("# Rosette Configuration"));
        assert!(updated.contains("color = \"#DAA520\""));

        let reparsed: Config = toml::from_str(&updated).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn saving_into_empty_document_adds_sections() {
        let updated = Config::default().apply_to_document("").unwrap();
        let reparsed: Config = toml::from_str(&updated).unwrap();
        assert_eq!(reparsed, Config::default());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/rosette.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/rosette.toml"));
    }
}
