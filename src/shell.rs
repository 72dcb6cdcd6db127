//! Extracting write targets from Bash commands.
//!
//! The hook cannot gate a shell command as a whole, only the file paths it
//! can prove the command writes to. Two sources of targets are recognized:
//! arguments of known mutating commands (`touch`, `rm`, `mv`, ...) and output
//! redirection targets (`>`, `>>`, `&>`, `N>`). A command with neither is
//! unrestricted.
//!
//! Scanning is quote-aware: operators inside single or double quotes are
//! text, not syntax. fd duplication (`2>&1`, `>&-`) and process substitution
//! (`>(...)`) are not file writes and produce no target.

use crate::engine::Operation;

/// Commands whose path arguments are deletions.
const DELETE_COMMANDS: &[&str] = &["rm", "rmdir", "unlink", "shred"];

/// Commands whose path arguments are modifications.
const MODIFY_COMMANDS: &[&str] = &["touch", "tee", "truncate", "mv", "cp", "install"];

/// Flags of the recognized commands that consume the following word, so
/// that word is an option value rather than a file operand. `mv -t` and
/// `cp -t` are absent on purpose: their operand is itself a write
/// destination and must stay in the argument list.
fn value_flags(command: &str) -> &'static [&'static str] {
    match command {
        "truncate" => &["-s", "-r"],
        "shred" => &["-n", "-s"],
        "install" => &["-m", "-o", "-g"],
        "cp" | "mv" => &["-S"],
        _ => &[],
    }
}

/// Split a command at shell operators (&&, ||, ;, |, |&),
/// respecting single/double quotes and backslash escapes.
pub fn split_compound(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();

    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];

        if esc {
            buf.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            buf.push(c);
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            buf.push(c);
            i += 1;
            continue;
        }
        if sq || dq {
            buf.push(c);
            i += 1;
            continue;
        }

        // Two-char operators
        if i + 1 < len {
            let two: String = chars[i..=i + 1].iter().collect();
            if two == "&&" || two == "||" || two == "|&" {
                parts.push(buf.trim().to_string());
                buf.clear();
                i += 2;
                continue;
            }
        }

        // Single-char operators
        if c == '|' || c == ';' {
            parts.push(buf.trim().to_string());
            buf.clear();
            i += 1;
            continue;
        }

        buf.push(c);
        i += 1;
    }

    let tail = buf.trim().to_string();
    if !tail.is_empty() {
        parts.push(tail);
    }

    parts.retain(|p| !p.is_empty());
    parts
}

/// Collect the file paths an output redirection writes to.
///
/// Recognizes `>`, `>>`, `&>`, `&>>`, and `N>` / `N>>` outside quotes.
/// Skips input redirection, here-docs, process substitution `>(...)`, and
/// fd duplication/closing (`2>&1`, `>&2`, `2>&-`).
pub fn redirection_targets(command: &str) -> Vec<String> {
    let chars: Vec<char> = command.chars().collect();
    let len = chars.len();
    let mut targets = Vec::new();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < len {
        let c = chars[i];

        if esc {
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            i += 1;
            continue;
        }
        if sq || dq {
            i += 1;
            continue;
        }

        // &> or &>>
        if c == '&' && i + 1 < len && chars[i + 1] == '>' {
            i += 2;
            if i < len && chars[i] == '>' {
                i += 1;
            }
            if let Some((word, next)) = read_word(&chars, i) {
                targets.push(word);
                i = next;
            }
            continue;
        }

        // N>, N>>, but not N>&M / N>&-
        if c.is_ascii_digit() && i + 1 < len && chars[i + 1] == '>' {
            if i + 2 < len
                && chars[i + 2] == '&'
                && i + 3 < len
                && (chars[i + 3].is_ascii_digit() || chars[i + 3] == '-')
            {
                i += 4;
                continue;
            }
            i += 2;
            if i < len && chars[i] == '>' {
                i += 1;
            }
            if let Some((word, next)) = read_word(&chars, i) {
                targets.push(word);
                i = next;
            }
            continue;
        }

        // > or >>, but not >( / >&N / >&-
        if c == '>' {
            if i + 1 < len && chars[i + 1] == '(' {
                i += 1;
                continue;
            }
            if i + 1 < len
                && chars[i + 1] == '&'
                && i + 2 < len
                && (chars[i + 2].is_ascii_digit() || chars[i + 2] == '-')
            {
                i += 3;
                continue;
            }
            i += 1;
            if i < len && chars[i] == '>' {
                i += 1;
            }
            if let Some((word, next)) = read_word(&chars, i) {
                targets.push(word);
                i = next;
            }
            continue;
        }

        i += 1;
    }

    targets
}

/// Read the shell word starting at (or after whitespace from) `start`,
/// stripping quotes. Returns the word and the index just past it.
fn read_word(chars: &[char], start: usize) -> Option<(String, usize)> {
    let len = chars.len();
    let mut i = start;
    while i < len && chars[i].is_whitespace() {
        i += 1;
    }
    if i >= len {
        return None;
    }

    let mut word = String::new();
    let (mut sq, mut dq, mut esc) = (false, false, false);
    while i < len {
        let c = chars[i];
        if esc {
            word.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
            i += 1;
            continue;
        }
        if c == '\'' && !dq {
            sq = !sq;
            i += 1;
            continue;
        }
        if c == '"' && !sq {
            dq = !dq;
            i += 1;
            continue;
        }
        if !sq && !dq && (c.is_whitespace() || matches!(c, ';' | '|' | '&' | '<' | '>')) {
            break;
        }
        word.push(c);
        i += 1;
    }

    if word.is_empty() { None } else { Some((word, i)) }
}

/// Tokenize a command segment into words using shlex (POSIX word splitting).
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        // Fallback: simple whitespace splitting if shlex can't parse
        command.split_whitespace().map(String::from).collect()
    })
}

/// `FOO=bar` style leading assignment?
fn is_env_assignment(word: &str) -> bool {
    match word.split_once('=') {
        Some((name, _)) => {
            !name.is_empty()
                && name
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

fn basename(word: &str) -> &str {
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ => word,
    }
}

/// Extract the write targets of a single (non-compound) command segment:
/// path arguments of known mutating commands plus redirection targets.
pub fn write_targets(segment: &str) -> Vec<(String, Operation)> {
    let mut targets = Vec::new();

    let words = tokenize(segment);
    let mut iter = words.iter().skip_while(|w| is_env_assignment(w));
    if let Some(command_word) = iter.next() {
        let base = basename(command_word);
        let op = if DELETE_COMMANDS.contains(&base) {
            Some(Operation::Delete)
        } else if MODIFY_COMMANDS.contains(&base) {
            Some(Operation::Modify)
        } else {
            None
        };
        if let Some(op) = op {
            let flags_with_value = value_flags(base);
            let mut opts_done = false;
            let mut skip_next = false;
            for word in iter {
                if skip_next {
                    skip_next = false;
                    continue;
                }
                // Redirections belong to redirection_targets, but an
                // argument fused to one (`touch a>b.txt`) still carries a
                // real operand before the operator
                if let Some(pos) = word.find(['>', '<']) {
                    let operand = &word[..pos];
                    if !operand.is_empty() && !operand.chars().all(|c| c.is_ascii_digit()) {
                        targets.push((operand.to_string(), op));
                    } else if word.chars().all(|c| matches!(c, '>' | '<' | '&') || c.is_ascii_digit())
                    {
                        // Bare operator token; the following word is its
                        // target and belongs to redirection_targets
                        skip_next = true;
                    }
                    continue;
                }
                if !opts_done && word.starts_with('-') {
                    if word == "--" {
                        opts_done = true;
                    } else if flags_with_value.contains(&word.as_str()) {
                        skip_next = true;
                    }
                    continue;
                }
                targets.push((word.clone(), op));
            }
        }
    }

    for target in redirection_targets(segment) {
        targets.push((target, Operation::Modify));
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_simple() {
        assert_eq!(split_compound("ls -la"), vec!["ls -la"]);
    }

    #[test]
    fn split_and_chain() {
        assert_eq!(split_compound("touch a && rm b"), vec!["touch a", "rm b"]);
    }

    #[test]
    fn split_semicolon_and_pipe() {
        assert_eq!(
            split_compound("cat f ; grep x | wc -l"),
            vec!["cat f", "grep x", "wc -l"]
        );
    }

    #[test]
    fn split_quoted_operator_is_text() {
        assert_eq!(split_compound("echo 'a && b'"), vec!["echo 'a && b'"]);
    }

    #[test]
    fn redir_simple_target() {
        assert_eq!(redirection_targets("echo hi > out.txt"), vec!["out.txt"]);
    }

    #[test]
    fn redir_append_target() {
        assert_eq!(redirection_targets("cmd >> log.txt"), vec!["log.txt"]);
    }

    #[test]
    fn redir_stderr_target() {
        assert_eq!(redirection_targets("cmd 2> err.txt"), vec!["err.txt"]);
    }

    #[test]
    fn redir_both_streams_target() {
        assert_eq!(redirection_targets("cmd &> all.txt"), vec!["all.txt"]);
    }

    #[test]
    fn redir_no_space_before_target() {
        assert_eq!(redirection_targets("cmd >out.txt"), vec!["out.txt"]);
    }

    #[test]
    fn redir_quoted_target_keeps_spaces() {
        assert_eq!(
            redirection_targets("echo x > \"my file.txt\""),
            vec!["my file.txt"]
        );
    }

    #[test]
    fn fd_duplication_is_not_a_target() {
        assert!(redirection_targets("cmd 2>&1").is_empty());
        assert!(redirection_targets("cmd >&2").is_empty());
        assert!(redirection_targets("cmd 2>&-").is_empty());
    }

    #[test]
    fn input_redirection_is_not_a_target() {
        assert!(redirection_targets("sort < data.txt").is_empty());
    }

    #[test]
    fn process_substitution_is_not_a_target() {
        assert!(redirection_targets("diff <(sort a) >(sort b)").is_empty());
    }

    #[test]
    fn quoted_angle_bracket_is_text() {
        assert!(redirection_targets("echo 'a > b'").is_empty());
    }

    #[test]
    fn touch_args_are_modify_targets() {
        let targets = write_targets("touch a.txt b.txt");
        assert_eq!(
            targets,
            vec![
                ("a.txt".to_string(), Operation::Modify),
                ("b.txt".to_string(), Operation::Modify)
            ]
        );
    }

    #[test]
    fn rm_args_are_delete_targets() {
        let targets = write_targets("rm -rf build/");
        assert_eq!(targets, vec![("build/".to_string(), Operation::Delete)]);
    }

    #[test]
    fn flag_value_is_not_a_target() {
        let targets = write_targets("truncate -s 10 f.txt");
        assert_eq!(targets, vec![("f.txt".to_string(), Operation::Modify)]);
    }

    #[test]
    fn install_mode_value_is_not_a_target() {
        let targets = write_targets("install -m 644 src dst");
        assert_eq!(
            targets,
            vec![
                ("src".to_string(), Operation::Modify),
                ("dst".to_string(), Operation::Modify)
            ]
        );
    }

    #[test]
    fn double_dash_ends_option_parsing() {
        let targets = write_targets("rm -- -x");
        assert_eq!(targets, vec![("-x".to_string(), Operation::Delete)]);
    }

    #[test]
    fn mv_target_directory_operand_is_gated() {
        // -t's operand is a write destination, not an option value
        let targets = write_targets("mv -t dest/ file.txt");
        assert_eq!(
            targets,
            vec![
                ("dest/".to_string(), Operation::Modify),
                ("file.txt".to_string(), Operation::Modify)
            ]
        );
    }

    #[test]
    fn fused_redirect_argument_is_still_gated() {
        let targets = write_targets("touch a>b.txt");
        assert_eq!(
            targets,
            vec![
                ("a".to_string(), Operation::Modify),
                ("b.txt".to_string(), Operation::Modify)
            ]
        );
    }

    #[test]
    fn fused_fd_redirect_has_no_argument_operand() {
        let targets = write_targets("touch x.txt 2>err.log");
        assert_eq!(
            targets,
            vec![
                ("x.txt".to_string(), Operation::Modify),
                ("err.log".to_string(), Operation::Modify)
            ]
        );
    }

    #[test]
    fn env_prefix_is_skipped() {
        let targets = write_targets("FOO=bar touch x.txt");
        assert_eq!(targets, vec![("x.txt".to_string(), Operation::Modify)]);
    }

    #[test]
    fn absolute_command_path_still_recognized() {
        let targets = write_targets("/bin/rm x.txt");
        assert_eq!(targets, vec![("x.txt".to_string(), Operation::Delete)]);
    }

    #[test]
    fn redirection_target_comes_through_write_targets() {
        let targets = write_targets("echo test > out.txt");
        assert_eq!(targets, vec![("out.txt".to_string(), Operation::Modify)]);
    }

    #[test]
    fn redirection_target_not_doubled_as_argument() {
        let targets = write_targets("tee a.txt > b.txt");
        assert_eq!(
            targets,
            vec![
                ("a.txt".to_string(), Operation::Modify),
                ("b.txt".to_string(), Operation::Modify)
            ]
        );
    }

    #[test]
    fn readonly_command_has_no_targets() {
        assert!(write_targets("git status").is_empty());
        assert!(write_targets("ls -la").is_empty());
        assert!(write_targets("cat notes.txt").is_empty());
    }
}
