//! Figment configuration file handling

use anyhow::{Context, Result};
use figment_core::MoveSteps;
use figment_image::ParseOptions;
use figment_paint::{Color, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "figment.toml";

/// Top-level Figment configuration (figment.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FigmentConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub compositor: CompositorConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Byte sniffing options
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Accept whitespace before the opening `<` of an SVG document
    #[serde(default)]
    pub allow_leading_whitespace: bool,
}

/// When a scenario switches from the drop view to the comparison ring
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComparisonConfig {
    #[serde(default = "default_min_layers")]
    pub min_layers: usize,
}

fn default_min_layers() -> usize {
    2
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            min_layers: default_min_layers(),
        }
    }
}

/// Compositor configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CompositorConfig {
    /// Size assumed for vector layers whose size is unknown
    #[serde(default = "default_fallback_size")]
    pub fallback_size: Size,
    /// Truncate layer rects to whole pixels
    #[serde(default = "default_true")]
    pub snap_to_pixels: bool,
    /// Number of parsed drawables kept between frames
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_selection_stroke_width")]
    pub selection_stroke_width: f32,
    #[serde(default = "default_selection_dash")]
    pub selection_dash: Vec<f32>,
    #[serde(default = "default_selection_color")]
    pub selection_color: Color,
}

fn default_fallback_size() -> Size {
    Size::new(50.0, 50.0)
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    64
}

fn default_selection_stroke_width() -> f32 {
    2.0
}

fn default_selection_dash() -> Vec<f32> {
    vec![6.0, 4.0]
}

fn default_selection_color() -> Color {
    Color::from_hex(0x0A84FF)
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            fallback_size: default_fallback_size(),
            snap_to_pixels: true,
            cache_capacity: default_cache_capacity(),
            selection_stroke_width: default_selection_stroke_width(),
            selection_dash: default_selection_dash(),
            selection_color: default_selection_color(),
        }
    }
}

/// Keyboard move distances
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandsConfig {
    #[serde(default = "default_step")]
    pub step: f32,
    #[serde(default = "default_leap")]
    pub leap: f32,
}

fn default_step() -> f32 {
    1.0
}

fn default_leap() -> f32 {
    10.0
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            leap: default_leap(),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// JSON snapshot written on every save
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LogConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset
    #[serde(default)]
    pub filter: Option<String>,
}

impl FigmentConfig {
    /// Load configuration from a file or a directory containing figment.toml
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found at {}. Run `figment init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load the given file, or figment.toml in the working directory if it
    /// exists, or fall back to defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None if Path::new(CONFIG_FILE).exists() => Self::load_from_path(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            allow_leading_whitespace: self.parser.allow_leading_whitespace,
        }
    }

    pub fn move_steps(&self) -> MoveSteps {
        MoveSteps {
            step: self.commands.step,
            leap: self.commands.leap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = FigmentConfig::from_toml("").expect("parse");
        assert_eq!(config, FigmentConfig::default());
        assert_eq!(config.comparison.min_layers, 2);
        assert_eq!(config.compositor.fallback_size, Size::new(50.0, 50.0));
        assert_eq!(config.move_steps(), MoveSteps::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = FigmentConfig::from_toml(
            r#"
            [parser]
            allow_leading_whitespace = true

            [commands]
            leap = 25.0

            [log]
            filter = "figment_app=debug"
            "#,
        )
        .expect("parse");

        assert!(config.parse_options().allow_leading_whitespace);
        assert_eq!(config.commands.step, 1.0);
        assert_eq!(config.commands.leap, 25.0);
        assert!(config.compositor.snap_to_pixels);
        assert_eq!(config.log.filter.as_deref(), Some("figment_app=debug"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = FigmentConfig::default();
        config.store.snapshot = Some(PathBuf::from("figment.json"));
        config.compositor.cache_capacity = 8;

        let text = config.to_toml().expect("serialize");
        assert_eq!(FigmentConfig::from_toml(&text).expect("parse"), config);
    }

    #[test]
    fn test_missing_file_mentions_init() {
        let missing = std::env::temp_dir().join("figment-no-such-dir").join(CONFIG_FILE);
        let err = FigmentConfig::load_from_path(&missing).expect_err("missing");
        assert!(err.to_string().contains("figment init"));
    }
}
