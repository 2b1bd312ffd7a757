//! Core environment credential classification engine for envsift.
//!
//! This crate decides, for each environment variable, whether it holds a
//! credential and which network hosts legitimately consume it. It is
//! designed to be embedded in CLIs, sandbox supervisors, and CI pipelines.
//!
//! # Main Types
//!
//! - [`Classifier`] - Runs the classification precedence chain over names and values
//! - [`PatternStore`] - Validated, compiled ruleset loaded from the bundled dataset
//! - [`ClassifyResult`] - The verdict for one variable, with hosts and provenance
//! - [`Config`] - User configuration loaded from `.envsift.toml`
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors that library
//! consumers can match on:
//!
//! - [`StoreError`] - Dataset integrity, schema, and compilation failures
//! - [`ConfigError`] - Configuration loading/parsing failures
//! - [`EnvsiftError`] - Top-level error enum combining the above
//!
//! Classification itself is infallible: once a [`PatternStore`] exists,
//! every name/value pair produces a verdict. The CLI crate (`envsift_cli`)
//! uses `anyhow` for error propagation.

/// The classification engine and environment aggregator.
pub mod classify;
/// User configuration loaded from `.envsift.toml`.
pub mod config;
/// Rule dataset types and schema validation.
pub mod dataset;
/// Line-oriented `.env` parsing.
pub mod dotenv;
/// Error types for store construction and configuration.
pub mod error;
/// Forwarding adapter for sandbox and proxy supervisors.
pub mod forwarding;
/// Regex dialect normalization for the portable pattern syntax.
pub mod normalize;
/// Common re-exports for internal use.
pub mod prelude;
/// The validated, compiled pattern store.
pub mod store;

pub use classify::{ClassifyEnvResult, ClassifyOptions, ClassifyResult, Classifier, EnvMap, MatchSource};
pub use config::{Config, ConfigError};
pub use dataset::{HostMap, RuleDataset, ValuePatternRule};
pub use dotenv::{DotenvParseResult, ParseDotenvOptions, parse_dotenv};
pub use error::{CompilationError, EnvsiftError, IntegrityError, PatternFailure, SchemaError, StoreError};
pub use forwarding::{ForwardingPlan, SecretSpec, forwarding_plan};
pub use store::{CompileFailureMode, PatternStore};

/// Default filename for envsift configuration.
pub const CONFIG_FILENAME: &str = ".envsift.toml";
