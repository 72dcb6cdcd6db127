//! Combining a directory's committed and local rule sets.
//!
//! Per-field semantics differ deliberately: blocked lists are additive
//! (committed entries first, then local), while a local allowed list replaces
//! the committed one entirely. A committed allow-list combined with a local
//! block-list (or vice versa) is a contradiction and fails closed.

use crate::rules::{ConfigError, Mode, PatternRule, RuleSet};

/// The merged, per-directory rule set consumed by the decision engine.
///
/// Built fresh for every decision from the two source files at the winning
/// directory; nothing is cached across requests.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub mode: Mode,
    pub allowed_entries: Vec<PatternRule>,
    pub blocked_entries: Vec<PatternRule>,
    pub default_guide: Option<String>,
}

impl EffectiveConfig {
    fn from_rule_set(rs: RuleSet) -> Self {
        let (allowed, blocked) = match rs.mode {
            Mode::AllowList => (rs.entries, Vec::new()),
            Mode::BlockList => (Vec::new(), rs.entries),
            Mode::BlockAll => (Vec::new(), Vec::new()),
        };
        Self {
            mode: rs.mode,
            allowed_entries: allowed,
            blocked_entries: blocked,
            default_guide: rs.default_guide,
        }
    }
}

/// Merge the two sides found at the winning directory.
///
/// At least one side is present (the resolver only stops at a directory that
/// has a file); a lone side is used verbatim.
pub fn merge(
    committed: Option<RuleSet>,
    local: Option<RuleSet>,
) -> Result<EffectiveConfig, ConfigError> {
    let (committed, local) = match (committed, local) {
        (Some(c), Some(l)) => (c, l),
        (Some(c), None) => return Ok(EffectiveConfig::from_rule_set(c)),
        (None, Some(l)) => return Ok(EffectiveConfig::from_rule_set(l)),
        (None, None) => {
            return Err(ConfigError::Invalid(
                "nothing to merge: no configuration on either side".into(),
            ));
        }
    };

    let default_guide = local.default_guide.or(committed.default_guide);

    use Mode::*;
    let (mode, allowed, blocked) = match (committed.mode, local.mode) {
        (AllowList, BlockList) | (BlockList, AllowList) => {
            return Err(ConfigError::Invalid(
                "committed and local configs use conflicting modes \
                 (one allows, the other blocks)"
                    .into(),
            ));
        }
        (BlockAll, BlockAll) => (BlockAll, Vec::new(), Vec::new()),
        // Blocked entries are a union, committed first
        (BlockList, BlockList) => {
            let mut entries = committed.entries;
            entries.extend(local.entries);
            (BlockList, Vec::new(), entries)
        }
        (BlockList, BlockAll) => (BlockList, Vec::new(), committed.entries),
        (BlockAll, BlockList) => (BlockList, Vec::new(), local.entries),
        // A local allowed list fully supersedes the committed one
        (AllowList, AllowList) => (AllowList, local.entries, Vec::new()),
        (AllowList, BlockAll) => (AllowList, committed.entries, Vec::new()),
        (BlockAll, AllowList) => (AllowList, local.entries, Vec::new()),
    };

    Ok(EffectiveConfig {
        mode,
        allowed_entries: allowed,
        blocked_entries: blocked,
        default_guide,
    })
}
