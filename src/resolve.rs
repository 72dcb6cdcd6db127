//! Locating the protection configuration that governs a target path.
//!
//! The walk starts at the target's own containing directory and climbs to the
//! filesystem root. The first directory where either config file exists wins
//! and the walk stops there: a `.claude-block` in `a/b` governs `a/b/c/x.txt`
//! unless `a/b/c` has one of its own. Ancestors past the winning directory
//! are never consulted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::rules::{self, ConfigError, RuleSet};

/// Committed protection file name (checked into the repo).
pub const CONFIG_FILE: &str = ".claude-block";
/// Local protection file name (git-ignored by convention).
pub const LOCAL_CONFIG_FILE: &str = ".claude-block.local";

/// The winning directory and whatever was found there.
///
/// Each side is `None` when the file is absent; a present file that is
/// unreadable or unparsable carries its [`ConfigError`] so the decision
/// engine can fail closed.
#[derive(Debug)]
pub struct ResolvedDir {
    pub dir: PathBuf,
    pub committed: Option<Result<RuleSet, ConfigError>>,
    pub local: Option<Result<RuleSet, ConfigError>>,
}

/// Walk the target's ancestry and return the nearest directory holding
/// protection configuration, or `None` when nothing up to the root does.
pub fn resolve(target: &Path) -> Option<ResolvedDir> {
    let start = target.parent()?;
    for dir in start.ancestors() {
        let committed = load_rule_set(&dir.join(CONFIG_FILE));
        let local = load_rule_set(&dir.join(LOCAL_CONFIG_FILE));
        if committed.is_some() || local.is_some() {
            return Some(ResolvedDir {
                dir: dir.to_path_buf(),
                committed,
                local,
            });
        }
    }
    None
}

/// Read and parse one config file as a single atomic snapshot.
///
/// The content is read in full before parsing, so a concurrent writer can
/// never hand us a half-written document through incremental reads. Absence
/// is `None`; any other read failure is an error the caller must treat as
/// fail-closed.
fn load_rule_set(path: &Path) -> Option<Result<RuleSet, ConfigError>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(rules::parse(&text)),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => None,
        Err(e) => Some(Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Mode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn no_config_anywhere_resolves_to_none() {
        let tmp = TempDir::new().unwrap();
        assert!(resolve(&tmp.path().join("a/b/target.txt")).is_none());
    }

    #[test]
    fn own_directory_wins() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "{}").unwrap();
        let resolved = resolve(&tmp.path().join("target.txt")).unwrap();
        assert_eq!(resolved.dir, tmp.path());
        assert!(resolved.committed.is_some());
        assert!(resolved.local.is_none());
    }

    #[test]
    fn nearest_ancestor_wins() {
        let tmp = TempDir::new().unwrap();
        let ab = tmp.path().join("a/b");
        fs::create_dir_all(ab.join("c")).unwrap();
        fs::write(ab.join(CONFIG_FILE), "{}").unwrap();
        let resolved = resolve(&ab.join("c/target.txt")).unwrap();
        assert_eq!(resolved.dir, ab);
    }

    #[test]
    fn closer_config_shadows_farther_one() {
        let tmp = TempDir::new().unwrap();
        let abc = tmp.path().join("a/b/c");
        fs::create_dir_all(&abc).unwrap();
        fs::write(tmp.path().join("a/b").join(CONFIG_FILE), r#"{"guide": "outer"}"#).unwrap();
        fs::write(abc.join(CONFIG_FILE), r#"{"guide": "inner"}"#).unwrap();
        let resolved = resolve(&abc.join("target.txt")).unwrap();
        assert_eq!(resolved.dir, abc);
        let rs = resolved.committed.unwrap().unwrap();
        assert_eq!(rs.default_guide.as_deref(), Some("inner"));
    }

    #[test]
    fn local_only_stops_the_walk() {
        let tmp = TempDir::new().unwrap();
        let abc = tmp.path().join("a/b/c");
        fs::create_dir_all(&abc).unwrap();
        // Committed config in a/b must be ignored once a/b/c has a local file
        fs::write(tmp.path().join("a/b").join(CONFIG_FILE), "{}").unwrap();
        fs::write(abc.join(LOCAL_CONFIG_FILE), r#"{"blocked": ["*.env"]}"#).unwrap();
        let resolved = resolve(&abc.join("target.txt")).unwrap();
        assert_eq!(resolved.dir, abc);
        assert!(resolved.committed.is_none());
        let local = resolved.local.unwrap().unwrap();
        assert_eq!(local.mode, Mode::BlockList);
    }

    #[test]
    fn both_files_at_one_level_are_loaded() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), r#"{"blocked": ["*.env"]}"#).unwrap();
        fs::write(tmp.path().join(LOCAL_CONFIG_FILE), r#"{"blocked": ["*.pem"]}"#).unwrap();
        let resolved = resolve(&tmp.path().join("x.txt")).unwrap();
        assert!(resolved.committed.unwrap().is_ok());
        assert!(resolved.local.unwrap().is_ok());
    }

    #[test]
    fn sibling_directory_config_does_not_apply() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("protected")).unwrap();
        fs::create_dir_all(tmp.path().join("open")).unwrap();
        fs::write(tmp.path().join("protected").join(CONFIG_FILE), "{}").unwrap();
        assert!(resolve(&tmp.path().join("open/x.txt")).is_none());
    }

    #[test]
    fn unparsable_file_still_wins_and_carries_the_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "{not json").unwrap();
        let resolved = resolve(&tmp.path().join("x.txt")).unwrap();
        assert!(resolved.committed.unwrap().is_err());
    }

    #[test]
    #[cfg(unix)]
    fn unreadable_file_still_wins_and_carries_an_io_error() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join(CONFIG_FILE);
        fs::write(&config, "{}").unwrap();
        fs::set_permissions(&config, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_to_string(&config).is_ok() {
            // running as root; mode bits are not enforced
            return;
        }
        let resolved = resolve(&tmp.path().join("x.txt")).unwrap();
        assert!(matches!(
            resolved.committed.unwrap(),
            Err(ConfigError::Io { .. })
        ));
    }
}
