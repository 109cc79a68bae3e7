use crate::board::MovePolicy;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use log::LevelFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `config.yml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fill the board with the sample tasks on startup.
    pub seed: bool,
    pub move_policy: MovePolicy,
    pub show_help: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub theme: ThemeConfig,
}

/// 256-color palette indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub focused_border: u8,
    pub muted: u8,
    pub help: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: true,
            move_policy: MovePolicy::default(),
            show_help: true,
            log_file: None,
            log_level: LevelFilter::Info,
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            focused_border: 62,
            muted: 241,
            help: 241,
        }
    }
}

/// Loads the config at `explicit`, or at the platform default location.
///
/// A missing default file yields the defaults; a missing explicit file is an
/// error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let data = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    parse_config(&data).with_context(|| format!("parsing {:?}", path))
}

pub fn parse_config(data: &str) -> Result<Config> {
    if data.trim().is_empty() {
        return Ok(Config::default());
    }
    let config = serde_yaml::from_str(data)?;
    Ok(config)
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.yml"))
}

pub fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join("kanban.log"))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "kanban")
}
