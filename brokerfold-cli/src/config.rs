use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Holds one `YYYY-MM` directory of statements per month
    pub statements_dir: PathBuf,
    /// Default tracing filter; `RUST_LOG` wins when set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            statements_dir: PathBuf::from("../statements/ADMIS"),
            log_level: "info".to_string(),
        }
    }
}

pub fn brokerfold_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".brokerfold"))
}

/// Explicit path if given, else `~/.brokerfold/config.toml` when it exists, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = match brokerfold_home() {
                Ok(home) => home.join("config.toml"),
                Err(_) => return Ok(Config::default()),
            };
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };
    read_config(&path)
}

pub fn read_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}
