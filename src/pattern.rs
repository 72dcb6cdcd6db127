//! Glob matching for protection rule patterns.
//!
//! Patterns and paths both use `/` as the separator. Semantics:
//!   - `?` matches exactly one character, never `/`
//!   - `*` matches zero or more characters, never `/`
//!   - `**` matches zero or more characters including `/`; a leading `**/`
//!     also matches zero directories, so `**/*.ts` matches `x.ts` at the root
//!   - everything else is literal and case-sensitive
//!
//! The whole pattern must match the whole path (anchored at both ends).
//! Matching is total: there is no such thing as an invalid pattern, only one
//! that never matches.

/// Match a relative path against a glob pattern.
pub fn matches(pattern: &str, path: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = path.chars().collect();
    match_from(&pat, &text)
}

fn match_from(pat: &[char], text: &[char]) -> bool {
    let Some(&c) = pat.first() else {
        return text.is_empty();
    };

    // `**` crosses directory boundaries
    if c == '*' && pat.get(1) == Some(&'*') {
        let rest = &pat[2..];
        // `**/` can swallow the separator too, matching zero directories
        if rest.first() == Some(&'/') && match_from(&rest[1..], text) {
            return true;
        }
        return (0..=text.len()).any(|i| match_from(rest, &text[i..]));
    }

    match c {
        // `*`: any run of non-separator characters, including empty
        '*' => {
            let rest = &pat[1..];
            let mut i = 0;
            loop {
                if match_from(rest, &text[i..]) {
                    return true;
                }
                match text.get(i) {
                    Some(&ch) if ch != '/' => i += 1,
                    _ => return false,
                }
            }
        }
        // `?`: exactly one non-separator character
        '?' => match text.first() {
            Some(&ch) if ch != '/' => match_from(&pat[1..], &text[1..]),
            _ => false,
        },
        // Literal
        _ => match text.first() {
            Some(&ch) if ch == c => match_from(&pat[1..], &text[1..]),
            _ => false,
        },
    }
}
