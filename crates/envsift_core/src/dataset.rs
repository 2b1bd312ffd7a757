//! Rule dataset types and schema validation.
//!
//! The dataset is shipped as JSON and validated field-by-field before
//! anything downstream trusts it. Validation is an explicit walk over the
//! parsed document rather than a serde derive, so every violation carries
//! the path of the offending field.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::SchemaError;

/// Map from a keyword or exact variable name to its legitimate hosts.
pub type HostMap = BTreeMap<String, Vec<String>>;

/// One value-matching rule from the dataset, in source-dialect form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePatternRule {
    /// Unique rule identifier (e.g. `"github-pat"`).
    pub id: String,
    /// Provider keyword used to resolve hosts for value matches.
    pub keyword: Option<String>,
    /// Pattern source in the portable dialect; normalized before compiling.
    pub regex: String,
    /// Additional literal hints carried by the upstream dataset.
    pub secondary_keywords: Option<Vec<String>>,
    /// Capture group holding the secret itself, when the rule has one.
    pub secret_group: Option<u32>,
}

/// The validated, versioned ruleset.
///
/// `value_patterns` order is match priority: the first rule whose matcher
/// hits a value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDataset {
    /// Dataset schema version, a positive integer.
    pub schema_version: u64,
    /// Timestamp of dataset generation (RFC 3339 string).
    pub generated_at: String,
    /// Keyword to hosts, consulted for value- and name-keyword matches.
    pub keyword_host_map: HostMap,
    /// Exact variable name to hosts, consulted before keyword scanning.
    pub exact_name_host_map: HostMap,
    /// Ordered value-matching rules.
    pub value_patterns: Vec<ValuePatternRule>,
}

const TOP_LEVEL_KEYS: [&str; 5] = [
    "schema_version",
    "generated_at",
    "keyword_host_map",
    "exact_name_host_map",
    "value_patterns",
];

const VALUE_PATTERN_KEYS: [&str; 5] = ["id", "keyword", "regex", "secondary_keywords", "secret_group"];

impl RuleDataset {
    /// Validates a parsed JSON document against the dataset schema.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let Some(root) = value.as_object() else {
            return Err(SchemaError::new("<root>", "mapping must be a JSON object"));
        };

        for key in root.keys() {
            if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
                return Err(SchemaError::new("<root>", format!("unknown top-level key: {key}")));
            }
        }

        let schema_version = match root.get("schema_version").and_then(Value::as_u64) {
            Some(version) if version > 0 => version,
            _ => return Err(SchemaError::new("schema_version", "must be a positive integer")),
        };

        Ok(Self {
            schema_version,
            generated_at: expect_non_empty_string(root.get("generated_at"), "generated_at")?,
            keyword_host_map: validate_host_map(root.get("keyword_host_map"), "keyword_host_map")?,
            exact_name_host_map: validate_host_map(root.get("exact_name_host_map"), "exact_name_host_map")?,
            value_patterns: validate_value_patterns(root.get("value_patterns"))?,
        })
    }
}

fn expect_non_empty_string(value: Option<&Value>, path: &str) -> Result<String, SchemaError> {
    match value.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(SchemaError::new(path, "must be a non-empty string")),
    }
}

fn expect_host_list(value: Option<&Value>, path: &str) -> Result<Vec<String>, SchemaError> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Err(SchemaError::new(path, "must be an array of strings"));
    };

    if items.is_empty() {
        return Err(SchemaError::new(path, "must not be empty"));
    }

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(s) if !s.is_empty() => out.push(s.to_string()),
            _ => return Err(SchemaError::new(format!("{path}[{index}]"), "must be a non-empty string")),
        }
    }

    Ok(out)
}

fn validate_host_map(value: Option<&Value>, path: &str) -> Result<HostMap, SchemaError> {
    let Some(map) = value.and_then(Value::as_object) else {
        return Err(SchemaError::new(path, "must be an object mapping string keys to string arrays"));
    };

    let mut out = HostMap::new();
    for (key, hosts) in map {
        if key.is_empty() {
            return Err(SchemaError::new(path, "contains an empty key"));
        }
        out.insert(key.clone(), expect_host_list(Some(hosts), &format!("{path}.{key}"))?);
    }

    Ok(out)
}

fn validate_value_patterns(value: Option<&Value>) -> Result<Vec<ValuePatternRule>, SchemaError> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Err(SchemaError::new("value_patterns", "must be an array"));
    };

    let mut out = Vec::with_capacity(items.len());
    let mut seen_ids = BTreeSet::new();

    for (index, item) in items.iter().enumerate() {
        let path = format!("value_patterns[{index}]");
        out.push(validate_value_pattern(item, &path, &mut seen_ids)?);
    }

    Ok(out)
}

fn validate_value_pattern(
    item: &Value,
    path: &str,
    seen_ids: &mut BTreeSet<String>,
) -> Result<ValuePatternRule, SchemaError> {
    let Some(entry) = item.as_object() else {
        return Err(SchemaError::new(path, "must be an object"));
    };

    for key in entry.keys() {
        if !VALUE_PATTERN_KEYS.contains(&key.as_str()) {
            return Err(SchemaError::new(path, format!("contains unknown key: {key}")));
        }
    }

    let id = expect_non_empty_string(entry.get("id"), &format!("{path}.id"))?;
    if !seen_ids.insert(id.clone()) {
        return Err(SchemaError::new(format!("{path}.id"), format!("duplicate pattern id: {id}")));
    }

    let regex = expect_non_empty_string(entry.get("regex"), &format!("{path}.regex"))?;

    let keyword = match entry.get("keyword") {
        None => None,
        value => Some(expect_non_empty_string(value, &format!("{path}.keyword"))?),
    };

    let secondary_keywords = match entry.get("secondary_keywords") {
        None => None,
        value => Some(expect_host_list(value, &format!("{path}.secondary_keywords"))?),
    };

    let secret_group = match entry.get("secret_group") {
        None => None,
        Some(value) => match value.as_u64().and_then(|group| u32::try_from(group).ok()) {
            Some(group) => Some(group),
            None => {
                return Err(SchemaError::new(
                    format!("{path}.secret_group"),
                    "must be a non-negative integer",
                ));
            }
        },
    };

    Ok(ValuePatternRule {
        id,
        keyword,
        regex,
        secondary_keywords,
        secret_group,
    })
}
