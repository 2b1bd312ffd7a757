//! The compiled pattern store.
//!
//! Loads the bundled rule dataset exactly once: integrity-check the text,
//! validate the structure, normalize and compile every value pattern, and
//! build the keyword index. The result is immutable for the lifetime of
//! the process; classification only ever reads from it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::dataset::RuleDataset;
use crate::error::{CompilationError, IntegrityError, PatternFailure, StoreError};
use crate::normalize;

/// The bundled rule dataset, embedded at compile time.
pub const DATASET_JSON: &str = include_str!("../data/secret-mapping.json");

/// Expected SHA-256 digest of [`DATASET_JSON`]. Regenerated whenever the
/// dataset file changes; a mismatch aborts store construction.
pub const DATASET_SHA256: &str = "fbb6979ca48a7dfd537e7c17ed679db28966e55103bfe46673d3a669a51e008e";

/// What to do when one or more value patterns fail to compile.
///
/// Fail-fast is the contract: a store with silently missing patterns
/// would under-detect without anyone noticing. Tolerant loading is an
/// explicit opt-in that records the failures on the store instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompileFailureMode {
    /// Abort construction, enumerating every failing rule id.
    #[default]
    Fail,
    /// Keep the store; failing rules are excluded from matching and
    /// listed in [`PatternStore::failed_patterns`].
    Tolerate,
}

/// A value pattern compiled for the host regex engine.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Rule identifier from the dataset.
    pub id: String,
    /// Provider keyword used for host resolution on value matches.
    pub keyword: Option<String>,
    /// The compiled matcher.
    pub matcher: Regex,
}

/// One keyword with its normalized form and deduped hosts.
///
/// Entries are pre-sorted by normalized length descending, then keyword
/// ascending; that ordering alone decides which keyword wins when several
/// are substrings of a variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    /// The keyword as it appears in the dataset.
    pub keyword: String,
    /// Lower-cased, separator-stripped form used for containment checks.
    pub normalized: String,
    /// Deduped hosts for this keyword, in dataset order.
    pub hosts: Vec<String>,
}

/// Immutable snapshot of the validated and compiled ruleset.
pub struct PatternStore {
    dataset: RuleDataset,
    compiled: Vec<CompiledPattern>,
    failed: Vec<PatternFailure>,
    keyword_entries: Vec<KeywordEntry>,
}

impl fmt::Debug for PatternStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternStore")
            .field("schema_version", &self.dataset.schema_version)
            .field("compiled", &self.compiled.len())
            .field("failed", &self.failed.len())
            .field("keywords", &self.keyword_entries.len())
            .finish_non_exhaustive()
    }
}

impl PatternStore {
    /// Loads the bundled dataset with fail-fast compile semantics.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_with(CompileFailureMode::Fail)
    }

    /// Loads the bundled dataset with the given compile-failure handling.
    pub fn load_with(mode: CompileFailureMode) -> Result<Self, StoreError> {
        let store = Self::from_text(DATASET_JSON, DATASET_SHA256, mode)?;

        #[cfg(feature = "tracing")]
        debug!(
            compiled = store.compiled.len(),
            failed = store.failed.len(),
            keywords = store.keyword_entries.len(),
            "pattern store constructed"
        );

        Ok(store)
    }

    /// Returns the process-lifetime shared store, constructing it on
    /// first call. Safe under concurrent first use; construction errors
    /// are cached and returned to every caller.
    pub fn shared() -> Result<&'static Self, StoreError> {
        static SHARED: OnceLock<Result<PatternStore, StoreError>> = OnceLock::new();
        SHARED.get_or_init(Self::load).as_ref().map_err(Clone::clone)
    }

    pub(crate) fn from_text(text: &str, expected_sha256: &str, mode: CompileFailureMode) -> Result<Self, StoreError> {
        let actual = sha256_hex(text);
        if actual != expected_sha256 {
            return Err(IntegrityError {
                expected: expected_sha256.to_string(),
                actual,
            }
            .into());
        }

        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|source| StoreError::Parse(source.to_string()))?;
        let dataset = RuleDataset::from_value(&value)?;

        Self::from_dataset(dataset, mode)
    }

    /// Builds a store from an already-validated dataset.
    ///
    /// Each rule is normalized and compiled independently, so one
    /// malformed rule cannot corrupt its neighbours; failures are
    /// collected with their ids and reasons.
    pub fn from_dataset(dataset: RuleDataset, mode: CompileFailureMode) -> Result<Self, StoreError> {
        let mut compiled = Vec::with_capacity(dataset.value_patterns.len());
        let mut failed = Vec::new();

        for rule in &dataset.value_patterns {
            match normalize::compile(&rule.regex) {
                Ok(matcher) => compiled.push(CompiledPattern {
                    id: rule.id.clone(),
                    keyword: rule.keyword.clone(),
                    matcher,
                }),
                Err(source) => failed.push(PatternFailure {
                    id: rule.id.clone(),
                    error: source.to_string(),
                }),
            }
        }

        if !failed.is_empty() && mode == CompileFailureMode::Fail {
            return Err(CompilationError { failures: failed }.into());
        }

        let keyword_entries = build_keyword_entries(&dataset);

        Ok(Self {
            dataset,
            compiled,
            failed,
            keyword_entries,
        })
    }

    /// Returns the validated dataset backing this store.
    #[must_use]
    pub fn dataset(&self) -> &RuleDataset {
        &self.dataset
    }

    /// Returns the compiled value patterns in dataset (priority) order.
    #[must_use]
    pub fn compiled_patterns(&self) -> &[CompiledPattern] {
        &self.compiled
    }

    /// Returns rules that failed to compile (empty unless loaded with
    /// [`CompileFailureMode::Tolerate`]).
    #[must_use]
    pub fn failed_patterns(&self) -> &[PatternFailure] {
        &self.failed
    }

    /// Returns the keyword entries in win-precedence order.
    #[must_use]
    pub fn keyword_entries(&self) -> &[KeywordEntry] {
        &self.keyword_entries
    }
}

fn build_keyword_entries(dataset: &RuleDataset) -> Vec<KeywordEntry> {
    let mut entries: Vec<KeywordEntry> = dataset
        .keyword_host_map
        .iter()
        .map(|(keyword, hosts)| KeywordEntry {
            keyword: keyword.clone(),
            normalized: normalize_token(keyword),
            hosts: dedupe_hosts(hosts),
        })
        .collect();

    entries.sort_by(|a, b| {
        b.normalized
            .len()
            .cmp(&a.normalized.len())
            .then_with(|| a.keyword.cmp(&b.keyword))
    });

    entries
}

/// Lower-cases a token and strips `-`, `_`, and whitespace, so that
/// `HUGGING_FACE` and `huggingface` compare equal.
pub(crate) fn normalize_token(token: &str) -> String {
    token
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .collect()
}

/// Removes duplicate hosts, keeping first occurrence order.
pub(crate) fn dedupe_hosts(hosts: &[String]) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    hosts
        .iter()
        .filter(|host| seen.insert(host.as_str()))
        .cloned()
        .collect()
}

fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
