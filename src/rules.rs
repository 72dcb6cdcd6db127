//! Protection rule documents: parsing and validation.
//!
//! A `.claude-block` file is a JSON document with up to three keys:
//!
//! ```json
//! {
//!   "blocked": ["*.env", {"pattern": "secrets/**", "guide": "ask ops first"}],
//!   "guide": "this directory holds deployment secrets"
//! }
//! ```
//!
//! The mode is derived from which list keys are present: neither means the
//! whole directory is protected (`BlockAll`), `allowed` alone means only the
//! listed patterns may be touched (`AllowList`), `blocked` alone means only
//! the listed patterns are protected (`BlockList`). A document carrying both
//! keys is invalid, not silently resolved.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why a protection configuration could not be used.
///
/// Both variants fail closed: the decision engine converts them into a
/// Block verdict rather than letting an unreadable or self-contradictory
/// config grant access.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid protection config: {0}")]
    Invalid(String),
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One glob pattern plus an optional human-readable guide message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub pattern: String,
    pub guide: Option<String>,
}

/// How a rule set restricts its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No list keys: everything in the directory is protected.
    BlockAll,
    /// `allowed` key: only matching paths may be modified.
    AllowList,
    /// `blocked` key: matching paths are protected, everything else is free.
    BlockList,
}

/// One parsed configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    pub mode: Mode,
    pub entries: Vec<PatternRule>,
    pub default_guide: Option<String>,
}

// ── Wire format ──

#[derive(Deserialize)]
struct Document {
    allowed: Option<Vec<Entry>>,
    blocked: Option<Vec<Entry>>,
    guide: Option<String>,
}

/// An entry is either a bare pattern string or an object with a required
/// `pattern` and optional `guide`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Bare(String),
    Full {
        pattern: String,
        guide: Option<String>,
    },
}

impl From<Entry> for PatternRule {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::Bare(pattern) => PatternRule {
                pattern,
                guide: None,
            },
            Entry::Full { pattern, guide } => PatternRule { pattern, guide },
        }
    }
}

/// Parse one protection document.
///
/// Empty input (or an empty object) is a valid block-everything config.
/// Malformed JSON, an entry without `pattern`, or both `allowed` and
/// `blocked` present all yield [`ConfigError::Invalid`].
pub fn parse(text: &str) -> Result<RuleSet, ConfigError> {
    if text.trim().is_empty() {
        return Ok(RuleSet {
            mode: Mode::BlockAll,
            entries: Vec::new(),
            default_guide: None,
        });
    }

    let doc: Document = serde_json::from_str(text)
        .map_err(|e| ConfigError::Invalid(format!("malformed document: {e}")))?;

    let (mode, entries) = match (doc.allowed, doc.blocked) {
        (Some(_), Some(_)) => {
            return Err(ConfigError::Invalid(
                "both 'allowed' and 'blocked' are present; pick one".into(),
            ));
        }
        (Some(allowed), None) => (Mode::AllowList, allowed),
        (None, Some(blocked)) => (Mode::BlockList, blocked),
        (None, None) => (Mode::BlockAll, Vec::new()),
    };

    Ok(RuleSet {
        mode,
        entries: entries.into_iter().map(PatternRule::from).collect(),
        default_guide: doc.guide,
    })
}
