//! cc-pathguard: PreToolUse hook for Claude Code.
//!
//! Reads one tool-call JSON from stdin, evaluates the target path against
//! `.claude-block` protection rules, and writes the verdict to stdout:
//!
//! ```json
//! {"decision": "block", "reason": "secrets"}
//! ```
//!
//! Tools the hook does not gate produce no output. The process exits 0
//! either way; a nonzero exit means the hook itself failed, never a verdict.

use std::io::Read;

use cc_pathguard::{hook, logging, settings::Settings};

fn main() {
    let settings = Settings::load();
    logging::init(&settings);

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("failed to read stdin");
        std::process::exit(1);
    }

    let hook_input: hook::HookInput = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("JSON parse error: {e}");
            std::process::exit(1);
        }
    };

    let Some(result) = hook::evaluate(&hook_input) else {
        // Not a gated tool: stay silent so the host applies no opinion
        std::process::exit(0);
    };

    match serde_json::to_string(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to serialize verdict: {e}");
            std::process::exit(1);
        }
    }
}
