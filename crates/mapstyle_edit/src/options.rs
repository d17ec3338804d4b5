use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::DEFAULT_MERGE_WINDOW_MS;

/// Persisted styling options.
///
/// Loaded once at startup and handed to the session; changes made through
/// the API take effect immediately and are written back with `store()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylingOptions {
    /// Edits closer together than this collapse into one undo step
    #[serde(default = "default_merge_timeout")]
    pub undo_merge_timeout_ms: u64,

    /// Apply panel edits automatically
    #[serde(default = "default_true")]
    pub live_apply: bool,

    /// Delay between an edit and its automatic apply
    #[serde(default = "default_auto_apply_delay")]
    pub auto_apply_delay_ms: u64,

    /// Maximum undo entries per layer, 0 = unlimited
    #[serde(default)]
    pub undo_limit: usize,
}

fn default_merge_timeout() -> u64 {
    DEFAULT_MERGE_WINDOW_MS
}
fn default_true() -> bool {
    true
}
fn default_auto_apply_delay() -> u64 {
    100
}

impl Default for StylingOptions {
    fn default() -> Self {
        Self {
            undo_merge_timeout_ms: DEFAULT_MERGE_WINDOW_MS,
            live_apply: true,
            auto_apply_delay_ms: 100,
            undo_limit: 0,
        }
    }
}

impl StylingOptions {
    pub const FILE_NAME: &'static str = "options.toml";

    pub fn merge_window(&self) -> Duration {
        i64::try_from(self.undo_merge_timeout_ms)
            .ok()
            .and_then(Duration::try_milliseconds)
            .unwrap_or(Duration::MAX)
    }

    pub fn auto_apply_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.auto_apply_delay_ms)
    }

    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "GitHub", "mapstyle").map(|p| p.config_dir().to_path_buf())
    }

    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(Self::FILE_NAME))
    }

    /// Load from the user's configuration directory, defaults if there is none
    pub fn load() -> Self {
        let Some(config_dir) = Self::config_dir() else {
            return Self::default();
        };
        if !config_dir.exists() && fs::create_dir_all(&config_dir).is_err() {
            log::error!("Can't create configuration directory {:?}", config_dir);
            return Self::default();
        }
        Self::load_from(&config_dir.join(Self::FILE_NAME))
    }

    /// Load from `path`. A missing or broken file gives the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(txt) => match toml::from_str(&txt) {
                Ok(result) => return result,
                Err(err) => log::error!("Error parsing options file {:?}: {}", path, err),
            },
            Err(err) => log::error!("Error reading options file: {}", err),
        }
        Self::default()
    }

    pub fn store(&self) {
        if let Some(file_name) = Self::config_file() {
            self.store_to(&file_name);
        }
    }

    pub fn store_to(&self, path: &Path) {
        match toml::to_string_pretty(self) {
            Ok(text) => {
                if let Err(err) = fs::write(path, text) {
                    log::error!("Error writing options file: {}", err);
                }
            }
            Err(err) => log::error!("Error serializing options file: {}", err),
        }
    }
}
