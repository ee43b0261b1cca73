use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Image files, relative to `dir`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub background: PathBuf,
    pub avatar: PathBuf,
    pub moon: PathBuf,
    pub moon_normal: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            background: PathBuf::from("space_img.webp"),
            avatar: PathBuf::from("selfie.jpg"),
            moon: PathBuf::from("moon.jpeg"),
            moon_normal: PathBuf::from("bumps.jpeg"),
        }
    }
}

/// Geometry of the virtual page the scene scrolls behind
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Total page height in pixels
    pub height: f32,
    /// Pixels per wheel notch
    pub line_height: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            height: 4000.0,
            line_height: 100.0,
        }
    }
}

/// Everything tunable about a run. Every field has a default, so an empty
/// JSON object is a valid config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub page: PageConfig,
    /// Star placement seed; a fresh one is drawn per run when absent
    pub seed: Option<u64>,
    pub show_helpers: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            assets: AssetConfig::default(),
            page: PageConfig::default(),
            seed: None,
            show_helpers: true,
        }
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Config file (if any) with command-line flags layered on top
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(cli);
        Ok(config)
    }

    fn apply(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.assets {
            self.assets.dir = dir.clone();
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.fullscreen {
            self.window.fullscreen = true;
        }
        if cli.no_helpers {
            self.show_helpers = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        let config: SceneConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert!(config.show_helpers);
        assert_eq!(config.assets.moon_normal, PathBuf::from("bumps.jpeg"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: SceneConfig =
            serde_json::from_str(r#"{ "window": { "width": 800 }, "seed": 42 }"#).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn flags_override_file() {
        let mut config = SceneConfig {
            seed: Some(1),
            ..Default::default()
        };
        config.apply(&Cli {
            assets: Some(PathBuf::from("/srv/images")),
            seed: Some(9),
            fullscreen: true,
            no_helpers: true,
            ..Default::default()
        });

        assert_eq!(config.assets.dir, PathBuf::from("/srv/images"));
        assert_eq!(config.seed, Some(9));
        assert!(config.window.fullscreen);
        assert!(!config.show_helpers);
    }

    #[test]
    fn absent_flags_leave_file_alone() {
        let mut config = SceneConfig {
            seed: Some(1),
            ..Default::default()
        };
        config.apply(&Cli::default());
        assert_eq!(config.seed, Some(1));
        assert!(config.show_helpers);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SceneConfig::load(Path::new("/nonexistent/folio.json")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config"));
    }

    #[test]
    fn load_reads_json_file() {
        let path = std::env::temp_dir().join(format!("folio-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "show_helpers": false, "page": { "height": 2500 } }"#).unwrap();

        let config = SceneConfig::load(&path).unwrap();
        assert!(!config.show_helpers);
        assert_eq!(config.page.height, 2500.0);
        assert_eq!(config.page.line_height, 100.0);
    }
}
