//! Browser configuration loaded from an optional TOML file.

use std::path::Path;

use serde::Deserialize;

use crate::error::{GlimpseError, Result};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV_VAR: &str = "GLIMPSE_CONFIG";

/// Page geometry, scrolling and request defaults.
///
/// Every field has a default so a config file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels. Doubles as the viewport height.
    pub height: u32,
    /// Glyph cell width, also the left and right margin.
    pub hstep: i32,
    /// Line height, also the top margin.
    pub vstep: i32,
    /// Pixels moved per scroll command.
    pub scroll_step: i32,
    /// Page loaded when no URL is given on the command line.
    pub default_url: String,
    /// Value of the `User-Agent` request header.
    pub user_agent: String,
    pub window_title: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            hstep: 13,
            vstep: 18,
            scroll_step: 100,
            default_url: "file:///usr/share/glimpse/index.html".to_string(),
            user_agent: "glimpse".to_string(),
            window_title: "Glimpse".to_string(),
        }
    }
}

impl BrowserConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry that would stall wrapping or invert scrolling.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("hstep", self.hstep),
            ("vstep", self.vstep),
            ("scroll_step", self.scroll_step),
        ] {
            if value <= 0 {
                return Err(GlimpseError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.width == 0 || self.height == 0 || i32::try_from(self.height).is_err() {
            return Err(GlimpseError::Config(format!(
                "invalid canvas size {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GlimpseError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the file named by [`CONFIG_ENV_VAR`], or fall back to the
    /// defaults when the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Height of the visible window in pixels.
    pub fn viewport_height(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }

    /// Vertical advance after a newline (1.5 line heights).
    pub fn paragraph_spacing(&self) -> f32 {
        1.5 * self.vstep as f32
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_values() {
        let cfg = BrowserConfig::default();
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, 600);
        assert_eq!(cfg.hstep, 13);
        assert_eq!(cfg.vstep, 18);
        assert_eq!(cfg.scroll_step, 100);
        assert_eq!(cfg.viewport_height(), 600);
        assert!((cfg.paragraph_spacing() - 27.0).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = BrowserConfig::from_toml("height = 400\nuser_agent = \"test\"\n").unwrap();
        assert_eq!(cfg.height, 400);
        assert_eq!(cfg.user_agent, "test");
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.scroll_step, 100);
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = BrowserConfig::from_toml("").unwrap();
        assert_eq!(cfg, BrowserConfig::default());
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = BrowserConfig::from_toml("height = [").unwrap_err();
        assert!(matches!(err, GlimpseError::TomlParse(_)));
    }

    #[test]
    fn wrong_type_rejected() {
        let err = BrowserConfig::from_toml("height = \"tall\"").unwrap_err();
        assert!(matches!(err, GlimpseError::TomlParse(_)));
    }

    #[test]
    fn non_positive_steps_rejected() {
        for text in [
            "scroll_step = -100",
            "scroll_step = 0",
            "hstep = 0",
            "hstep = -13",
            "vstep = 0",
            "scroll_step = -2147483648",
        ] {
            let err = BrowserConfig::from_toml(text).unwrap_err();
            assert!(matches!(err, GlimpseError::Config(_)), "{text}: {err}");
        }
    }

    #[test]
    fn zero_canvas_rejected() {
        let err = BrowserConfig::from_toml("height = 0").unwrap_err();
        assert!(matches!(err, GlimpseError::Config(_)));
        assert!(BrowserConfig::default().validate().is_ok());
    }

    #[test]
    fn load_rejects_bad_geometry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scroll_step = -100").unwrap();
        let err = BrowserConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, GlimpseError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "vstep = 20").unwrap();
        let cfg = BrowserConfig::load(file.path()).unwrap();
        assert_eq!(cfg.vstep, 20);
        assert!((cfg.paragraph_spacing() - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = BrowserConfig::load(Path::new("/nonexistent/glimpse.toml")).unwrap_err();
        assert!(matches!(err, GlimpseError::Config(_)));
    }
}
