use anyhow::Result;
use clap::ValueEnum;
use pdf_outline::FlattenOptions;
use serde::Deserialize;
use std::{fs, path::Path};

// Represents the whole file. Keeps room for other tables next to `[config]`.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    pub config: Config,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab separated, one line per outline item
    #[default]
    Text,
    /// One JSON document per input file
    Json,
}

/// Options read from the `[config]` table of a TOML file. Every field is
/// optional.
#[derive(Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Outline items nested deeper than this are ignored.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_max_depth() -> u32 {
    FlattenOptions::default().max_depth
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: default_max_depth(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Loads the TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(toml::from_str::<ConfigFile>(&fs::read_to_string(path)?)?.config)
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            max_depth: self.max_depth,
        }
    }
}
