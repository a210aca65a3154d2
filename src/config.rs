//! Conversion options.
//!
//! Options can be written as YAML and loaded with [`ConversionOptions::load`];
//! the CLI overlays its flags on top. Every field has a default, so an empty
//! file is a valid configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DiagramError, Result};

/// Built-in tag names. Custom shapes may not reuse them.
pub const BUILTIN_TAGS: &[&str] = &["d", "s", "io", "c", "mo", "tr", "o"];

/// How `{tag}` markup is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    /// Tags set the kind of the shape they sit in and are removed from text.
    #[default]
    Use,
    /// Tags are left in the text as ordinary characters.
    Ignore,
}

/// How `cXXX` colour codes are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourCodeMode {
    /// Colour codes fill the shape they sit in and are removed from text.
    #[default]
    Use,
    /// Colour codes are left in the text as ordinary characters.
    Ignore,
}

/// A user-defined shape kind, selected with `{name}` inside a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomShapeDefinition {
    /// Image drawn in place of the outline, resolved by the renderer.
    pub filename: Option<PathBuf>,
    /// Stretch the image to the shape bounds instead of keeping its aspect.
    pub stretch: bool,
    pub drop_shadow: bool,
    pub comment: Option<String>,
}

impl Default for CustomShapeDefinition {
    fn default() -> Self {
        Self {
            filename: None,
            stretch: false,
            drop_shadow: true,
            comment: None,
        }
    }
}

/// Options for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Draw every corner rounded, whatever its glyph.
    pub all_corners_round: bool,
    /// Pull apart edges that two closed shapes share.
    pub separate_common_edges: bool,
    /// Width of one grid cell in output units.
    pub cell_width: f32,
    /// Height of one grid cell in output units.
    pub cell_height: f32,
    /// Multiplier applied to the cell size.
    pub scale: f32,
    /// Base font size for text labels.
    pub font_size: f32,
    /// Use `font_size` as is instead of fitting it to the cell height.
    pub fixed_font_size: bool,
    /// Tab stop width used when reading text.
    pub tab_size: usize,
    pub tags: TagMode,
    pub colour_codes: ColourCodeMode,
    /// Custom shape kinds by tag name.
    pub custom_shapes: BTreeMap<String, CustomShapeDefinition>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            all_corners_round: false,
            separate_common_edges: true,
            cell_width: 10.0,
            cell_height: 14.0,
            scale: 1.0,
            font_size: 12.0,
            fixed_font_size: false,
            tab_size: 8,
            tags: TagMode::Use,
            colour_codes: ColourCodeMode::Use,
            custom_shapes: BTreeMap::new(),
        }
    }
}

impl ConversionOptions {
    /// Load options from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DiagramError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse options from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| DiagramError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some("Check the YAML syntax and option names".to_string()),
        })
    }

    /// Reject values the converter cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("scale", self.scale),
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("font_size", self.font_size),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DiagramError::Config {
                    message: format!("{} must be a positive number, got {}", name, value),
                    help: None,
                });
            }
        }
        if self.tab_size == 0 {
            return Err(DiagramError::Config {
                message: "tab_size must be at least 1".to_string(),
                help: None,
            });
        }
        for name in self.custom_shapes.keys() {
            if BUILTIN_TAGS.contains(&name.as_str()) {
                return Err(DiagramError::Config {
                    message: format!("custom shape '{}' shadows a built-in tag", name),
                    help: Some(format!("Built-in tags are: {}", BUILTIN_TAGS.join(", "))),
                });
            }
            if name.is_empty() || name.chars().any(|c| c == '{' || c == '}' || c.is_whitespace()) {
                return Err(DiagramError::Config {
                    message: format!("invalid custom shape name '{}'", name),
                    help: Some("Names must be non-empty and contain no braces or spaces".to_string()),
                });
            }
        }
        Ok(())
    }

    /// Cell width after scaling.
    pub fn effective_cell_width(&self) -> f32 {
        self.cell_width * self.scale
    }

    /// Cell height after scaling.
    pub fn effective_cell_height(&self) -> f32 {
        self.cell_height * self.scale
    }

    /// Font size after scaling.
    pub fn effective_font_size(&self) -> f32 {
        self.font_size * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(ConversionOptions::parse("").unwrap(), ConversionOptions::default());
    }

    #[test]
    fn test_parse_partial() {
        let yaml = "all_corners_round: true\nscale: 2\ntags: ignore";
        let options = ConversionOptions::parse(yaml).unwrap();
        assert!(options.all_corners_round);
        assert_eq!(options.scale, 2.0);
        assert_eq!(options.tags, TagMode::Ignore);
        assert_eq!(options.cell_width, 10.0);
        assert!(options.separate_common_edges);
    }

    #[test]
    fn test_parse_custom_shapes() {
        let yaml = r#"
custom_shapes:
  robot:
    filename: robot.png
    stretch: true
"#;
        let options = ConversionOptions::parse(yaml).unwrap();
        let robot = &options.custom_shapes["robot"];
        assert_eq!(robot.filename, Some(PathBuf::from("robot.png")));
        assert!(robot.stretch);
        assert!(robot.drop_shadow);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = ConversionOptions::parse("scale: [1, 2");
        assert!(matches!(result, Err(DiagramError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_scale() {
        let options = ConversionOptions {
            scale: -1.0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(DiagramError::Config { .. })));

        let options = ConversionOptions {
            cell_height: 0.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_builtin_shadowing() {
        let mut options = ConversionOptions::default();
        options
            .custom_shapes
            .insert("d".to_string(), CustomShapeDefinition::default());
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_effective_sizes() {
        let options = ConversionOptions {
            scale: 2.0,
            ..Default::default()
        };
        assert_eq!(options.effective_cell_width(), 20.0);
        assert_eq!(options.effective_cell_height(), 28.0);
        assert_eq!(options.effective_font_size(), 24.0);
    }
}
