use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::indent::IndentSettings;

/// Top-level YAML config file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    editor: EditorSection,
    window: WindowSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EditorSection {
    font_size: Option<f32>,
    tab_width: Option<usize>,
    use_spaces: Option<bool>,
    auto_indent: Option<bool>,
    line_numbers: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindowSection {
    width: Option<f32>,
    height: Option<f32>,
}

/// Runtime configuration with all defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub font_size: f32,
    pub indent: IndentSettings,
    pub line_numbers: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            indent: IndentSettings::default(),
            line_numbers: true,
            window_width: 900.0,
            window_height: 600.0,
        }
    }
}

impl Config {
    /// Platform-appropriate default config path.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        let base = if cfg!(target_os = "macos") {
            PathBuf::from(home).join("Library").join("Application Support")
        } else {
            PathBuf::from(home).join(".config")
        };
        base.join("countpad").join("config.yaml")
    }

    /// Load config from a YAML file, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Apply a YAML document on top of the defaults.
    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        let file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut config = Self::default();

        if let Some(v) = file.editor.font_size {
            config.set_font_size(v);
        }
        if let Some(v) = file.editor.tab_width {
            config.indent.tab_width = v.clamp(1, 16);
        }
        if let Some(v) = file.editor.use_spaces {
            config.indent.use_spaces = v;
        }
        if let Some(v) = file.editor.auto_indent {
            config.indent.auto_indent = v;
        }
        if let Some(v) = file.editor.line_numbers {
            config.line_numbers = v;
        }
        if let Some(v) = file.window.width {
            config.window_width = v;
        }
        if let Some(v) = file.window.height {
            config.window_height = v;
        }

        Ok(config)
    }

    /// Editor font size, kept within 6..=72 points.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size.clamp(6.0, 72.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(Config::parse("{}").expect("parse"), Config::default());
    }

    #[test]
    fn partial_sections_override_only_what_they_name() {
        let yaml = "editor:\n  tab_width: 2\n  use_spaces: false\nwindow:\n  height: 480\n";
        let config = Config::parse(yaml).expect("parse");

        assert_eq!(config.indent.tab_width, 2);
        assert!(!config.indent.use_spaces);
        assert!(config.indent.auto_indent);
        assert_eq!(config.window_height, 480.0);
        assert_eq!(config.window_width, 900.0);
        assert_eq!(config.font_size, 14.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config::parse("editor:\n  font_size: 500\n  tab_width: 0\n").expect("parse");
        assert_eq!(config.font_size, 72.0);
        assert_eq!(config.indent.tab_width, 1);
    }

    #[test]
    fn font_size_override_is_clamped() {
        let mut config = Config::default();
        config.set_font_size(2.0);
        assert_eq!(config.font_size, 6.0);
        config.set_font_size(1000.0);
        assert_eq!(config.font_size, 72.0);
        config.set_font_size(18.0);
        assert_eq!(config.font_size, 18.0);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(Config::parse("editor: [1, 2").is_err());
    }

    #[test]
    fn load_falls_back_on_missing_or_bad_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.yaml");
        assert_eq!(Config::load(Some(missing.as_path())), Config::default());

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "editor: {font_size: big}").expect("write");
        assert_eq!(Config::load(Some(bad.as_path())), Config::default());

        let good = dir.path().join("good.yaml");
        std::fs::write(&good, "editor:\n  line_numbers: false\n").expect("write");
        assert!(!Config::load(Some(good.as_path())).line_numbers);
    }
}
