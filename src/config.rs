// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::render::RendererChoice;

/// Deck settings. Every field has a default so a partial YAML file (or none
/// at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Directory or `http(s)://` base URL the `data/*.csv` paths are
    /// resolved against.
    pub data_source: String,
    pub output_dir: PathBuf,
    pub renderer: RendererChoice,
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            data_source: ".".to_string(),
            output_dir: PathBuf::from("out"),
            renderer: RendererChoice::Auto,
            surface_width: 800,
            surface_height: 400,
        }
    }
}

impl DeckConfig {
    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let text = fs::read_to_string(p)
                    .with_context(|| format!("reading config {}", p.display()))?;
                Self::from_yaml(&text).with_context(|| format!("parsing config {}", p.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_yaml_keeps_defaults() -> Result<()> {
        let cfg = DeckConfig::from_yaml("renderer: fallback\nsurface_width: 1024\n")?;
        assert_eq!(cfg.renderer, RendererChoice::Fallback);
        assert_eq!(cfg.surface_width, 1024);
        assert_eq!(cfg.surface_height, 400);
        assert_eq!(cfg.data_source, ".");
        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "data_source: https://deck.example.com/")?;
        writeln!(tmp, "output_dir: rendered")?;
        let cfg = DeckConfig::load(Some(tmp.path()))?;
        assert_eq!(cfg.data_source, "https://deck.example.com/");
        assert_eq!(cfg.output_dir, PathBuf::from("rendered"));
        assert_eq!(cfg.renderer, RendererChoice::Auto);
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_renderer() {
        assert!(DeckConfig::from_yaml("renderer: chartjs\n").is_err());
        assert_eq!(DeckConfig::load(None).ok(), Some(DeckConfig::default()));
    }
}
