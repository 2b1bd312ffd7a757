//! Forwarding adapter for sandbox and proxy supervisors.
//!
//! Reshapes a classification run into the structure an egress-filtering
//! supervisor consumes: every forwardable secret paired with its value and
//! allowed hosts, everything else either dropped or passed through.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classify::{Classifier, ClassifyOptions, ClassifyResult, EnvMap};

/// A secret ready to hand to a supervisor: the hosts that may receive it
/// and the concrete value to inject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretSpec {
    /// Hosts allowed to receive this credential.
    pub hosts: Vec<String>,
    /// The credential value, verbatim from the environment.
    pub value: String,
}

/// The full forwarding decision for one environment.
///
/// `secrets_map` covers exactly the entries of `secrets`; a variable never
/// appears in both `secrets` and `dropped`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForwardingPlan {
    /// Secrets with a host mapping and a concrete value.
    pub secrets: Vec<ClassifyResult>,
    /// Recognised secrets that must not be forwarded.
    pub dropped: Vec<ClassifyResult>,
    /// Names safe to pass through unmodified.
    pub safe: Vec<String>,
    /// Name to host-scoped value for every forwardable secret.
    pub secrets_map: BTreeMap<String, SecretSpec>,
}

/// Classifies `env` and builds a [`ForwardingPlan`].
///
/// A variable that classifies as a mapped secret but has no value in the
/// environment cannot be forwarded; it moves to `dropped` rather than
/// injecting an empty credential.
#[must_use]
pub fn forwarding_plan(classifier: &Classifier<'_>, env: &EnvMap, options: Option<&ClassifyOptions>) -> ForwardingPlan {
    let classified = classifier.classify_env(env, options);

    let mut plan = ForwardingPlan {
        dropped: classified.dropped,
        safe: classified.safe,
        ..ForwardingPlan::default()
    };

    for secret in classified.secrets {
        match env.get(&secret.name).and_then(Option::as_ref) {
            Some(value) => {
                plan.secrets_map.insert(
                    secret.name.clone(),
                    SecretSpec {
                        hosts: secret.hosts.clone(),
                        value: value.clone(),
                    },
                );
                plan.secrets.push(secret);
            }
            None => {
                let mut dropped = secret;
                dropped.dropped = true;
                dropped.reason = Some("secret has undefined value".to_string());
                plan.dropped.push(dropped);
            }
        }
    }

    plan
}
