//! cc-pathguard: a PreToolUse hook for Claude Code that protects directory
//! trees with declarative rules.
//!
//! Dropping a `.claude-block` file (or a git-ignored `.claude-block.local`)
//! into a directory makes the hook block file-modifying tool calls under
//! that directory. An empty document protects everything; an `allowed` list
//! permits only matching paths; a `blocked` list protects only matching
//! paths. The nearest directory with configuration wins, and the two files
//! at that level are merged (blocked lists union, a local allowed list
//! replaces the committed one).
//!
//! # Architecture
//!
//! - [`pattern`]: glob matching (`?`, `*`, `**`) over relative paths
//! - [`rules`]: per-file rule documents, parsing and validation
//! - [`resolve`]: nearest-ancestor configuration discovery
//! - [`merge`]: committed + local merge into one effective rule set
//! - [`engine`]: the allow/block verdict for one (path, operation)
//! - [`shell`]: write-target extraction from Bash commands
//! - [`hook`]: Claude Code adapter, input shape and tool mapping
//! - [`settings`], [`logging`]: user settings and file logging

/// Verdict computation: resolve, merge, match, fail closed.
pub mod engine;
/// Claude Code PreToolUse adapter.
pub mod hook;
/// Best-effort file logging.
pub mod logging;
/// Committed/local rule set merge semantics.
pub mod merge;
/// Glob pattern matching for rule entries.
pub mod pattern;
/// Nearest-directory configuration resolution.
pub mod resolve;
/// Protection document parsing and validation.
pub mod rules;
/// User settings (log level, log file).
pub mod settings;
/// Bash command splitting and write-target extraction.
pub mod shell;

pub use engine::{Decision, DecisionResult, Operation};

use std::path::Path;

/// Decide whether `operation` on `target` is allowed.
///
/// This is the main entry point for tests and in-process usage. Host
/// integrations that start from tool-call JSON go through [`hook::evaluate`].
pub fn decide(target: &Path, operation: Operation) -> DecisionResult {
    engine::decide(target, operation)
}
