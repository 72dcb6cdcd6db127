//! File logging to `~/.local/share/cc-pathguard/pathguard.log`.
//! Best-effort: failures are silently ignored (logging must never block
//! the hook).

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::settings::Settings;

/// Initialize the global logger from user settings. Safe to call once at
/// startup; when anything is missing (no HOME, unwritable directory, bad
/// level) the hook simply runs unlogged.
pub fn init(settings: &Settings) {
    let level = match settings.log_level.as_str() {
        "off" => return,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    let Some(path) = settings.log_file.clone().or_else(default_log_path) else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    else {
        return;
    };

    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = WriteLogger::init(level, config, file);
}

fn default_log_path() -> Option<std::path::PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(std::path::Path::new(&home).join(".local/share/cc-pathguard/pathguard.log"))
}
