//! Regex dialect normalizer.
//!
//! Rule patterns are authored in a portable dialect (Go/RE2-flavoured
//! anchors, POSIX bracket classes, Python-style named groups, inline mode
//! modifiers). This module rewrites one pattern's source text into syntax
//! the [`regex`] crate accepts, without altering what the pattern matches.
//!
//! Normalization is pure and total: it never fails, though its output may
//! still be rejected by the regex compiler downstream (surfaced there as a
//! compile failure, never as a normalizer error).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Whether the target regex engine supports scoped modifier groups like
/// `(?i:...)`. The [`regex`] crate does, so the scoped-rewrite path is the
/// production path; the flag-hoisting fallback is kept for engines that
/// lack the syntax and widens scoped flags to global ones (over-matching
/// raises recall, which is the safe direction for credential detection).
pub const SCOPED_FLAG_GROUPS: bool = true;

/// POSIX bracket-expression shorthands used by upstream rule datasets,
/// expanded to explicit ranges.
const POSIX_CLASS_REPLACEMENTS: [(&str, &str); 7] = [
    ("[[:alnum:]]", "[A-Za-z0-9]"),
    ("[[:alpha:]]", "[A-Za-z]"),
    ("[[:digit:]]", "[0-9]"),
    ("[[:xdigit:]]", "[A-Fa-f0-9]"),
    ("[[:lower:]]", "[a-z]"),
    ("[[:upper:]]", "[A-Z]"),
    ("[[:space:]]", "[\\t\\r\\n\\f\\v ]"),
];

static NAMED_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "static regex is known-valid at compile time")]
    Regex::new(r"\(\?P<([A-Za-z][A-Za-z0-9_]*)>").unwrap()
});

static SCOPED_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "static regex is known-valid at compile time")]
    Regex::new(r"\(\?(-?)([ims]+):").unwrap()
});

static BARE_FLAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "static regex is known-valid at compile time")]
    Regex::new(r"\(\?(-?)([ims]+)\)").unwrap()
});

/// A pattern rewritten into host-engine syntax, plus any global flags the
/// fallback path hoisted out of the pattern body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPattern {
    /// The rewritten pattern source.
    pub pattern: String,
    /// Global flags (sorted, e.g. `"im"`), empty on the scoped path.
    pub flags: String,
}

/// Rewrites `source` into [`regex`]-crate-compatible syntax.
#[must_use]
pub fn normalize(source: &str) -> NormalizedPattern {
    normalize_for(source, SCOPED_FLAG_GROUPS)
}

fn normalize_for(source: &str, scoped_flag_groups: bool) -> NormalizedPattern {
    // Go-compatible absolute end anchor.
    let mut pattern = source.replace("\\z", "$");

    for (posix, range) in POSIX_CLASS_REPLACEMENTS {
        pattern = pattern.replace(posix, range);
    }

    // Python-style named groups `(?P<name>...)`.
    pattern = NAMED_GROUP_RE.replace_all(&pattern, "(?<${1}>").into_owned();

    if scoped_flag_groups {
        NormalizedPattern {
            pattern: rewrite_bare_flags(&pattern),
            flags: String::new(),
        }
    } else {
        hoist_inline_flags(&pattern)
    }
}

/// Normalizes `source` and compiles it with the host engine, applying any
/// hoisted global flags as a leading `(?flags)` group.
pub fn compile(source: &str) -> Result<Regex, regex::Error> {
    let normalized = normalize(source);
    if normalized.flags.is_empty() {
        Regex::new(&normalized.pattern)
    } else {
        Regex::new(&format!("(?{}){}", normalized.flags, normalized.pattern))
    }
}

/// Returns the flag set of a bare modifier token `(?flags)` starting at
/// `chars[start]`, along with the token length in characters, when the
/// flags match `-?[ims]+`.
fn bare_flag_token(chars: &[char], start: usize) -> Option<(String, usize)> {
    if chars.get(start) != Some(&'(') || chars.get(start + 1) != Some(&'?') {
        return None;
    }

    let mut end = start + 2;
    while end < chars.len() && (chars[end].is_ascii_alphabetic() || chars[end] == '-') {
        end += 1;
    }

    if end == start + 2 || chars.get(end) != Some(&')') {
        return None;
    }

    let flags: String = chars[start + 2..end].iter().collect();
    if !supported_flag_set(&flags) {
        return None;
    }

    Some((flags, end - start + 1))
}

fn supported_flag_set(flags: &str) -> bool {
    let body = flags.strip_prefix('-').unwrap_or(flags);
    !body.is_empty() && body.chars().all(|c| matches!(c, 'i' | 'm' | 's'))
}

/// Rewrites bare inline modifiers (e.g. `(?i)`) into scoped groups
/// (e.g. `(?i:...)`) whose closing boundary lands exactly at the end of
/// the enclosing group.
///
/// Scans character-by-character tracking escapes, character classes, and
/// group nesting depth. Each bare modifier opens a scoped group and queues
/// a pending closure at the current depth; the queued closures are flushed
/// immediately before the `)` that closes that depth.
fn rewrite_bare_flags(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    let mut in_char_class = false;
    let mut depth = 0usize;
    let mut pending: BTreeMap<usize, usize> = BTreeMap::new();

    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];

        if escaped {
            out.push(ch);
            escaped = false;
            i += 1;
            continue;
        }

        if ch == '\\' {
            out.push(ch);
            escaped = true;
            i += 1;
            continue;
        }

        if in_char_class {
            out.push(ch);
            if ch == ']' {
                in_char_class = false;
            }
            i += 1;
            continue;
        }

        if ch == '[' {
            out.push(ch);
            in_char_class = true;
            i += 1;
            continue;
        }

        if ch == '(' {
            if let Some((flags, token_len)) = bare_flag_token(&chars, i) {
                out.push_str("(?");
                out.push_str(&flags);
                out.push(':');
                *pending.entry(depth).or_insert(0) += 1;
                i += token_len;
                continue;
            }

            depth += 1;
            out.push(ch);
            i += 1;
            continue;
        }

        if ch == ')' {
            if let Some(count) = pending.remove(&depth) {
                for _ in 0..count {
                    out.push(')');
                }
            }
            depth = depth.saturating_sub(1);
            out.push(ch);
            i += 1;
            continue;
        }

        out.push(ch);
        i += 1;
    }

    if let Some(count) = pending.remove(&depth) {
        for _ in 0..count {
            out.push(')');
        }
    }

    // Unbalanced input may leave closures queued at deeper levels; close
    // them deepest-first so the output at least nests consistently.
    for (_, count) in pending.iter().rev() {
        for _ in 0..*count {
            out.push(')');
        }
    }

    out
}

/// Fallback for engines without scoped modifier groups.
///
/// Strips both bare `(?i)` and scoped `(?i:...)` modifiers and collects
/// every *positive* flag mentioned into a global flag set. A flag meant
/// for part of the pattern now applies to all of it; for credential
/// detection this only over-matches, which is the sanctioned direction.
fn hoist_inline_flags(pattern: &str) -> NormalizedPattern {
    let mut collected: Vec<char> = Vec::new();

    let stripped = SCOPED_FLAG_RE.replace_all(pattern, |caps: &regex::Captures<'_>| {
        if caps[1].is_empty() {
            collected.extend(caps[2].chars());
        }
        "(?:".to_string()
    });

    let stripped = BARE_FLAG_RE.replace_all(&stripped, |caps: &regex::Captures<'_>| {
        if caps[1].is_empty() {
            collected.extend(caps[2].chars());
        }
        String::new()
    });

    collected.sort_unstable();
    collected.dedup();

    NormalizedPattern {
        pattern: stripped.into_owned(),
        flags: collected.into_iter().collect(),
    }
}
