//! Host adapter: Claude Code PreToolUse input → engine verdicts.
//!
//! This layer owns everything host-specific that the engine deliberately
//! doesn't know about: the input JSON shape, the tool-name → operation
//! lookup table, Bash write-target extraction, and tilde/relative path
//! resolution. The engine only ever sees an absolute path and an operation.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::{self, DecisionResult, Operation};
use crate::shell;

#[derive(Debug, Deserialize)]
pub struct HookInput {
    pub tool_name: Option<String>,
    pub tool_input: Option<ToolInput>,
    /// Working directory of the session, used to resolve relative targets.
    pub cwd: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    pub file_path: Option<String>,
    pub notebook_path: Option<String>,
    pub command: Option<String>,
}

/// Tools whose input names a single target file directly.
const FILE_TOOLS: &[(&str, Operation)] = &[
    ("Edit", Operation::Modify),
    ("Write", Operation::Modify),
    ("MultiEdit", Operation::Modify),
    ("NotebookEdit", Operation::Modify),
];

/// Evaluate one hook invocation.
///
/// Returns `None` for tools this hook does not gate (read-only tools,
/// unknown tools, or calls with no usable target); the host treats that
/// as no opinion.
pub fn evaluate(input: &HookInput) -> Option<DecisionResult> {
    let tool = input.tool_name.as_deref()?;
    let tool_input = input.tool_input.as_ref()?;
    let cwd = input.cwd.as_deref();

    if let Some((_, op)) = FILE_TOOLS.iter().find(|(name, _)| *name == tool) {
        let raw = tool_input
            .file_path
            .as_deref()
            .or(tool_input.notebook_path.as_deref())?;
        return Some(engine::decide(&absolutize(raw, cwd), *op));
    }

    if tool == "Bash" {
        let command = tool_input.command.as_deref()?;
        return Some(evaluate_bash(command, cwd));
    }

    None
}

/// Evaluate every provable write target in a (possibly compound) Bash
/// command. The worst decision across targets wins; a command with no
/// recognizable target is unrestricted.
fn evaluate_bash(command: &str, cwd: Option<&str>) -> DecisionResult {
    let mut worst = DecisionResult::allow();
    for segment in shell::split_compound(command) {
        for (raw, op) in shell::write_targets(&segment) {
            let result = engine::decide(&absolutize(&raw, cwd), op);
            if result.decision > worst.decision {
                worst = result;
            }
        }
    }
    worst
}

/// Tilde-expand a raw target and resolve it against the hook's working
/// directory. Targets need not exist (Write creates them), so this is
/// lexical, not canonicalizing.
fn absolutize(raw: &str, cwd: Option<&str>) -> PathBuf {
    let expanded = shellexpand::tilde(raw);
    let path = Path::new(expanded.as_ref());
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match cwd {
        Some(dir) => Path::new(dir).join(path),
        None => std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}
