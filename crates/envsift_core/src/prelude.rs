//! Convenience re-exports of the most commonly used types.

pub use crate::classify::{ClassifyEnvResult, ClassifyOptions, ClassifyResult, Classifier, EnvMap, MatchSource};
pub use crate::config::{Config, ConfigError};
pub use crate::error::{EnvsiftError, StoreError};
pub use crate::forwarding::{ForwardingPlan, SecretSpec, forwarding_plan};
pub use crate::store::{CompileFailureMode, PatternStore};
