use thiserror::Error;

/// The rule dataset failed structural validation.
///
/// Carries the path of the offending field (e.g.
/// `"value_patterns[3].id"`) so dataset regressions are diagnosable
/// without dumping the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid dataset schema at {path}: {message}")]
pub struct SchemaError {
    /// Dot/index path of the field that failed validation.
    pub path: String,
    /// What was expected at that path.
    pub message: String,
}

impl SchemaError {
    pub(crate) fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The bundled dataset text does not hash to its expected digest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dataset checksum mismatch for secret-mapping.json (expected {expected}, got {actual})")]
pub struct IntegrityError {
    /// The SHA-256 digest the build expects.
    pub expected: String,
    /// The SHA-256 digest of the bundled text.
    pub actual: String,
}

/// A single value pattern that failed to compile, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFailure {
    /// Identifier of the failing rule (e.g. `"github-pat"`).
    pub id: String,
    /// Stringified compilation error from the regex engine.
    pub error: String,
}

/// One or more value patterns failed to compile after normalization.
///
/// Every failing rule is enumerated; a partial store is never returned
/// unless the caller explicitly opted into tolerant loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct CompilationError {
    /// All rules that failed, in dataset order.
    pub failures: Vec<PatternFailure>,
}

impl std::fmt::Display for CompilationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self.failures.iter().map(|failure| failure.id.as_str()).collect();
        write!(
            f,
            "failed to compile {} value pattern(s): {}",
            self.failures.len(),
            ids.join(", ")
        )
    }
}

/// Errors that can occur while constructing the pattern store.
///
/// All variants are fatal at load time: classification must never run
/// against a corrupt, malformed, or partially compiled ruleset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The bundled dataset text failed its integrity check.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// The dataset is not valid JSON.
    #[error("dataset is not valid JSON: {0}")]
    Parse(String),

    /// The dataset parsed but failed structural validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// One or more value patterns failed to compile.
    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

/// Top-level error type for envsift.
///
/// Unifies store construction and configuration failures for callers
/// that orchestrate the full classify pipeline.
#[derive(Debug, Error)]
pub enum EnvsiftError {
    /// The pattern store could not be constructed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be read or parsed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display_includes_path_and_message() {
        let err = SchemaError::new("value_patterns[2].id", "must be a non-empty string");
        let text = err.to_string();
        assert!(text.contains("value_patterns[2].id"));
        assert!(text.contains("non-empty string"));
    }

    #[test]
    fn integrity_error_display_includes_both_digests() {
        let err = IntegrityError {
            expected: "aaaa".to_string(),
            actual: "bbbb".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("aaaa"));
        assert!(text.contains("bbbb"));
    }

    #[test]
    fn compilation_error_display_enumerates_failing_ids() {
        let err = CompilationError {
            failures: vec![
                PatternFailure {
                    id: "one".to_string(),
                    error: "bad".to_string(),
                },
                PatternFailure {
                    id: "two".to_string(),
                    error: "worse".to_string(),
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("2 value pattern(s)"));
        assert!(text.contains("one, two"));
    }
}
