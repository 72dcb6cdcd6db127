//! The decision engine: one verdict per (target path, operation).
//!
//! Pure apart from read-only filesystem access. Every failure mode (an
//! unreadable file, malformed JSON, contradictory modes) maps to a Block
//! verdict rather than an error the host would have to interpret: the whole
//! value of the protection feature is that uncertainty never grants access.

use std::path::Path;

use serde::Serialize;

use crate::merge;
use crate::pattern;
use crate::resolve::{self, CONFIG_FILE, LOCAL_CONFIG_FILE};
use crate::rules::Mode;

/// The verdict for one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Block,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Block => "block",
        }
    }
}

/// What the agent is trying to do to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Modify,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Modify => "modify",
            Operation::Delete => "delete",
        }
    }
}

/// The engine's answer. This exact two-field JSON shape
/// (`{"decision": "allow"|"block", "reason": <string|null>}`) is the
/// compatibility surface every host integration depends on.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResult {
    pub decision: Decision,
    pub reason: Option<String>,
}

impl DecisionResult {
    pub fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            reason: None,
        }
    }

    pub fn block(reason: Option<String>) -> Self {
        Self {
            decision: Decision::Block,
            reason,
        }
    }
}

/// Decide whether `operation` on `target` is allowed.
///
/// `target` should be absolute; the host adapter resolves relative paths
/// against the hook's working directory before calling in.
pub fn decide(target: &Path, operation: Operation) -> DecisionResult {
    // Protection config files are immutable to the gated actor, before and
    // regardless of any configured rules.
    if let Some(name) = target.file_name().and_then(|n| n.to_str())
        && (name == CONFIG_FILE || name == LOCAL_CONFIG_FILE)
    {
        log::info!(
            "block {} {}: config file is immutable",
            operation.as_str(),
            target.display()
        );
        return DecisionResult::block(Some(
            "protection configuration files cannot be modified".into(),
        ));
    }

    let Some(resolved) = resolve::resolve(target) else {
        log::debug!("allow {}: no protection config found", target.display());
        return DecisionResult::allow();
    };

    let committed = match resolved.committed.transpose() {
        Ok(c) => c,
        Err(e) => return DecisionResult::block(Some(e.to_string())),
    };
    let local = match resolved.local.transpose() {
        Ok(l) => l,
        Err(e) => return DecisionResult::block(Some(e.to_string())),
    };

    let effective = match merge::merge(committed, local) {
        Ok(eff) => eff,
        Err(e) => return DecisionResult::block(Some(e.to_string())),
    };

    // Relative path from the winning directory, canonical `/` separators
    let rel = match target.strip_prefix(&resolved.dir) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        // Cannot happen for a directory found by walking the target's own
        // ancestry, but an inexpressible path still fails closed.
        Err(_) => {
            return DecisionResult::block(Some(format!(
                "cannot express {} relative to {}",
                target.display(),
                resolved.dir.display()
            )));
        }
    };

    let result = match effective.mode {
        Mode::BlockAll => DecisionResult::block(effective.default_guide),
        Mode::AllowList => {
            if effective
                .allowed_entries
                .iter()
                .any(|e| pattern::matches(&e.pattern, &rel))
            {
                DecisionResult::allow()
            } else {
                // Allow entries say what is permitted, not why something
                // else is denied; only the document-level guide applies.
                DecisionResult::block(effective.default_guide)
            }
        }
        Mode::BlockList => {
            let matched: Vec<_> = effective
                .blocked_entries
                .iter()
                .filter(|e| pattern::matches(&e.pattern, &rel))
                .collect();
            if matched.is_empty() {
                DecisionResult::allow()
            } else {
                let reason = matched
                    .iter()
                    .find_map(|e| e.guide.clone())
                    .or(effective.default_guide);
                DecisionResult::block(reason)
            }
        }
    };

    log::info!(
        "{} {} {} (rules in {})",
        result.decision.as_str(),
        operation.as_str(),
        target.display(),
        resolved.dir.display()
    );
    result
}
