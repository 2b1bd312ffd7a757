//! Line-oriented `.env` parser.
//!
//! `.env` files are a simple `KEY=VALUE` format with no code constructs to
//! disambiguate, so a regex per line suffices. Parsing is lenient: malformed
//! lines are reported as warnings and skipped, never fatal, because a single
//! bad line must not hide the credentials on the lines around it.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// One `NAME=value` pair recovered from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAssignment {
    /// Variable name as written, minus any `export` prefix.
    pub name: String,
    /// Unquoted, unescaped value.
    pub value: String,
}

/// Options for [`parse_dotenv`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseDotenvOptions {
    /// Enable `${VAR}` interpolation against values defined in the same
    /// file. Disabled by default; expansion can be quadratic on large
    /// files and most callers want the literal text.
    pub expand: bool,
}

/// Parsed `.env` content: the recovered values plus per-line warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotenvParseResult {
    /// Recovered assignments. Duplicate names resolve last-wins.
    pub values: BTreeMap<String, String>,
    /// One entry per malformed line, e.g. `"line 3: not a valid assignment"`.
    pub errors: Vec<String>,
}

/// Assignment grammar: optional `export` prefix, a dotenv-compatible name
/// (`[\w.-]+`), `=` or `: ` separator, then a quoted or bare value with an
/// optional trailing comment.
static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "static regex is known-valid at compile time")]
    Regex::new(
        r#"^(?:export\s+)?([\w.-]+)(?:\s*=\s*?|:\s+?)(\s*'(?:\\'|[^'])*'|\s*"(?:\\"|[^"])*"|\s*`(?:\\`|[^`])*`|[^#\r\n]+)?\s*(?:#.*)?$"#,
    )
    .unwrap()
});

/// `${NAME}` or `$NAME` reference, with an optional escaping backslash.
static INTERPOLATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::unwrap_used, reason = "static regex is known-valid at compile time")]
    Regex::new(r"(\\)?\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap()
});

/// Returns true for lines that carry no assignment at all: blank lines and
/// full-line comments.
#[must_use]
pub fn is_ignorable_env_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parses a single line as an env assignment, or `None` if the line is
/// ignorable or malformed.
///
/// Quoted values are unquoted; double-quoted values additionally unescape
/// `\n` and `\r`.
#[must_use]
pub fn parse_env_assignment_line(line: &str) -> Option<EnvAssignment> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let captures = ASSIGNMENT_RE.captures(trimmed)?;
    let name = captures.get(1)?.as_str().to_string();
    let raw_value = captures.get(2).map_or("", |m| m.as_str());

    Some(EnvAssignment {
        name,
        value: normalize_value(raw_value),
    })
}

fn normalize_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next();

    let quoted = matches!(first, Some('\'' | '"' | '`')) && trimmed.len() >= 2 && trimmed.ends_with(first.unwrap_or('\0'));
    if !quoted {
        return trimmed.to_string();
    }

    let inner = &trimmed[1..trimmed.len() - 1];
    if first == Some('"') {
        inner.replace(r"\n", "\n").replace(r"\r", "\r")
    } else {
        inner.to_string()
    }
}

/// Parses `.env` content into a value map plus per-line warnings.
///
/// Lines are split on `\n` with an optional trailing `\r`; line numbers in
/// warnings are 1-based. Duplicate names resolve last-wins, matching how
/// shells and dotenv loaders apply a file top to bottom.
#[must_use]
pub fn parse_dotenv(content: &str, options: ParseDotenvOptions) -> DotenvParseResult {
    let mut ordered: Vec<EnvAssignment> = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if is_ignorable_env_line(line) {
            continue;
        }

        match parse_env_assignment_line(line) {
            Some(assignment) => ordered.push(assignment),
            None => errors.push(format!("line {}: not a valid assignment", index + 1)),
        }
    }

    let mut values = BTreeMap::new();
    if options.expand && content.contains('$') {
        // Expand in file order so references to earlier definitions resolve.
        for assignment in ordered {
            let expanded = expand_value(&assignment.value, &values);
            values.insert(assignment.name, expanded);
        }
    } else {
        for assignment in ordered {
            values.insert(assignment.name, assignment.value);
        }
    }

    DotenvParseResult { values, errors }
}

/// Substitutes `${NAME}` and `$NAME` references from `defined`. Unresolved
/// references expand to the empty string; `\$` escapes to a literal `$`.
fn expand_value(value: &str, defined: &BTreeMap<String, String>) -> String {
    INTERPOLATION_RE
        .replace_all(value, |captures: &Captures<'_>| {
            if captures.get(1).is_some() {
                let full = captures.get(0).map_or("", |m| m.as_str());
                return full[1..].to_string();
            }

            let name = captures
                .get(2)
                .or_else(|| captures.get(3))
                .map_or("", |m| m.as_str());
            defined.get(name).cloned().unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for clearer failure messages")]
mod tests {
    use super::*;

    fn parse(content: &str) -> DotenvParseResult {
        parse_dotenv(content, ParseDotenvOptions::default())
    }

    #[test]
    fn parses_simple_assignments() {
        let parsed = parse("FOO=bar\nBAZ=qux\n");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values["FOO"], "bar");
        assert_eq!(parsed.values["BAZ"], "qux");
        assert_eq!(parsed.values.len(), 2);
    }

    #[test]
    fn handles_export_prefix_quotes_and_comments() {
        let content = "\nexport API_KEY=\"value-1\" # inline comment\nPASSWORD='value-2'\n# full-line comment\nPLAIN=value-3\n";
        let parsed = parse(content);

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values["API_KEY"], "value-1");
        assert_eq!(parsed.values["PASSWORD"], "value-2");
        assert_eq!(parsed.values["PLAIN"], "value-3");
    }

    #[test]
    fn unescapes_newlines_in_double_quoted_values_only() {
        let parsed = parse("A=\"one\\ntwo\"\nB='one\\ntwo'\n");
        assert_eq!(parsed.values["A"], "one\ntwo");
        assert_eq!(parsed.values["B"], "one\\ntwo");
    }

    #[test]
    fn does_not_expand_interpolation_by_default() {
        let parsed = parse("API_HOST=api.example.com\nAPI_URL=https://${API_HOST}/v1\n");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values["API_URL"], "https://${API_HOST}/v1");
    }

    #[test]
    fn expands_interpolation_when_enabled() {
        let parsed = parse_dotenv(
            "API_HOST=api.example.com\nAPI_URL=https://${API_HOST}/v1\n",
            ParseDotenvOptions { expand: true },
        );
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values["API_HOST"], "api.example.com");
        assert_eq!(parsed.values["API_URL"], "https://api.example.com/v1");
    }

    #[test]
    fn expansion_leaves_escaped_dollar_literal() {
        let parsed = parse_dotenv("PRICE=\\$5\n", ParseDotenvOptions { expand: true });
        assert_eq!(parsed.values["PRICE"], "$5");
    }

    #[test]
    fn expansion_of_undefined_reference_is_empty() {
        let parsed = parse_dotenv("URL=https://${MISSING}/v1\n", ParseDotenvOptions { expand: true });
        assert_eq!(parsed.values["URL"], "https:///v1");
    }

    #[test]
    fn accepts_dotenv_compatible_key_names() {
        let parsed = parse("123INVALID_NAME=value\nNAME.WITH.DOTS=ok\nNAME-WITH-DASH=ok\n");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values["123INVALID_NAME"], "value");
        assert_eq!(parsed.values["NAME.WITH.DOTS"], "ok");
        assert_eq!(parsed.values["NAME-WITH-DASH"], "ok");
    }

    #[test]
    fn reports_malformed_lines_with_one_based_numbers() {
        let parsed = parse("GOOD=value\nnot an assignment\nANOTHER=ok\n");
        assert_eq!(parsed.values["GOOD"], "value");
        assert_eq!(parsed.values["ANOTHER"], "ok");
        assert_eq!(parsed.errors, vec!["line 2: not a valid assignment"]);
    }

    #[test]
    fn malformed_lines_do_not_hide_later_assignments() {
        let parsed = parse("???\nTOKEN=abc\n");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.values["TOKEN"], "abc");
    }

    #[test]
    fn duplicate_names_resolve_last_wins() {
        let parsed = parse("X=first\nX=second\n");
        assert_eq!(parsed.values["X"], "second");
    }

    #[test]
    fn colon_separator_requires_whitespace() {
        let parsed = parse("NAME: value\n");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values["NAME"], "value");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let parsed = parse("FOO=bar\r\nBAZ=qux\r\n");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values.len(), 2);
    }

    #[test]
    fn empty_value_is_allowed() {
        let parsed = parse("EMPTY=\n");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.values["EMPTY"], "");
    }

    #[test]
    fn ignorable_lines_are_detected() {
        assert!(is_ignorable_env_line(""));
        assert!(is_ignorable_env_line("   "));
        assert!(is_ignorable_env_line("# comment"));
        assert!(!is_ignorable_env_line("A=b"));
    }
}
