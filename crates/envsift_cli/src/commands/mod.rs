//! CLI command handlers.

/// Shell completion script generation.
pub mod completions;
/// Environment and dotenv file classification.
pub mod inspect;
/// Dataset rule listing and inspection.
pub mod patterns;

/// Convenience alias for command return types.
pub type Result<T = ()> = anyhow::Result<T>;
