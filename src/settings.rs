//! User settings for the hook binary.
//!
//! None of this affects decisions; protection rules live in the directory
//! tree. The settings file only tunes observability.

use serde::Deserialize;
use std::path::PathBuf;

/// Settings loaded from `~/.config/cc-pathguard/config.toml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level: off, error, warn, info, debug, trace.
    pub log_level: String,
    /// Override the default log file path.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load user settings, falling back to defaults when the file is absent
    /// or unparsable. A broken settings file must not break the hook.
    pub fn load() -> Self {
        let Some(home) = std::env::var_os("HOME") else {
            return Self::default();
        };
        let path = std::path::Path::new(&home).join(".config/cc-pathguard/config.toml");
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("cc-pathguard: settings parse error: {e}");
                Self::default()
            }
        }
    }
}
