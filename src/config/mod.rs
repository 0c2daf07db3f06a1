use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::StorageError,
    reminder::DUE_SOON_DAYS,
};

const TMP_SUFFIX: &str = "tmp";

/// User preferences persisted at `<base>/config/config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Roster opened at startup and written by `save`.
    pub roster_name: String,
    /// Overrides the directory rosters and backups live in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Reminders due within this many days are highlighted.
    pub due_soon_days: i64,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster_name: "roster".into(),
            data_dir: None,
            due_soon_days: DUE_SOON_DAYS,
            color: true,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 4] = ["roster_name", "data_dir", "due_soon_days", "color"];

    /// Applies a `config set` assignment. `data_dir` accepts `none` to clear.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "roster_name" => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err("roster_name must not be empty".into());
                }
                self.roster_name = trimmed.to_string();
            }
            "data_dir" => {
                self.data_dir = match value.trim() {
                    "" | "none" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            "due_soon_days" => {
                let days: i64 = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("`{}` is not a whole number", value))?;
                if days < 0 {
                    return Err("due_soon_days must not be negative".into());
                }
                self.due_soon_days = days;
            }
            "color" => {
                self.color = match value.trim().to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" | "1" => true,
                    "off" | "false" | "no" | "0" => false,
                    other => return Err(format!("`{}` is not on/off", other)),
                };
            }
            other => {
                return Err(format!(
                    "unknown key `{}` (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("roster_name", self.roster_name.clone()),
            (
                "data_dir",
                self.data_dir
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(default)".into()),
            ),
            ("due_soon_days", self.due_soon_days.to_string()),
            ("color", if self.color { "on" } else { "off" }.to_string()),
        ]
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, StorageError> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, StorageError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, StorageError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Loads the stored config, falling back to defaults when none exists yet.
    pub fn load(&self) -> Result<Config, StorageError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Directory rosters live in for `config`: its override or the base dir.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| self.base.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    tmp.set_extension(format!("json.{}", TMP_SUFFIX));
    tmp
}
