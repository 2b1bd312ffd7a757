//! Property-based tests for `envsift_core`.
//!
//! These tests verify invariants that should hold for all inputs,
//! catching edge cases that hand-written tests might miss.

use proptest::prelude::*;

use envsift_core::normalize;
use envsift_core::prelude::*;

fn classifier() -> Classifier<'static> {
    #[expect(clippy::unwrap_used, reason = "bundled dataset is known-valid")]
    Classifier::new(PatternStore::shared().unwrap())
}

proptest! {
    /// Classification never panics, whatever the name and value.
    #[test]
    fn classify_is_total(name in "\\PC*", value in "\\PC*") {
        let result = classifier().classify(&name, &value, None);
        prop_assert_eq!(result.name, name);
    }

    /// Same inputs always produce the same verdict.
    #[test]
    fn classify_is_deterministic(name in "[A-Za-z0-9_.-]{1,40}", value in "\\PC{0,80}") {
        let c = classifier();
        let first = c.classify(&name, &value, None);
        let second = c.classify(&name, &value, None);
        prop_assert_eq!(first, second);
    }

    /// A non-secret verdict never carries hosts, a drop reason, or a source.
    #[test]
    fn safe_verdicts_are_bare(name in "[A-Za-z0-9_.-]{1,40}", value in "[a-z]{0,20}") {
        let result = classifier().classify(&name, &value, None);
        if !result.is_secret {
            prop_assert!(result.hosts.is_empty());
            prop_assert!(!result.dropped);
            prop_assert!(result.matched_by.is_none());
            prop_assert!(result.reason.is_none());
        }
    }

    /// Dropped implies secret with no hosts, and carries a reason.
    #[test]
    fn dropped_verdicts_carry_a_reason(name in "[A-Za-z0-9_.-]{1,40}", value in "\\PC{0,80}") {
        let result = classifier().classify(&name, &value, None);
        if result.dropped {
            prop_assert!(result.is_secret);
            prop_assert!(result.hosts.is_empty());
            prop_assert!(result.reason.is_some());
        }
    }

    /// Every input name lands in exactly one aggregation bucket.
    #[test]
    fn classify_env_partition_is_complete(
        entries in proptest::collection::btree_map(
            "[A-Za-z0-9_]{1,30}",
            proptest::option::of("\\PC{0,40}"),
            0..20,
        )
    ) {
        let env: EnvMap = entries;
        let result = classifier().classify_env(&env, None);

        prop_assert_eq!(
            result.secrets.len() + result.dropped.len() + result.safe.len(),
            env.len()
        );

        for secret in &result.secrets {
            prop_assert!(env.contains_key(&secret.name));
            prop_assert!(!secret.hosts.is_empty());
        }
        for dropped in &result.dropped {
            prop_assert!(env.contains_key(&dropped.name));
        }
        for name in &result.safe {
            prop_assert!(env.contains_key(name));
        }
    }

    /// An override always wins, no matter what the value looks like.
    #[test]
    fn override_beats_value_detection(
        name in "[A-Za-z0-9_]{1,30}",
        value in "\\PC{0,80}",
        host in "[a-z]{1,10}\\.example\\.com",
    ) {
        let mut options = ClassifyOptions::default();
        options.overrides.insert(name.clone(), vec![host.clone()]);

        let result = classifier().classify(&name, &value, Some(&options));
        prop_assert_eq!(result.matched_by, Some(MatchSource::Override));
        prop_assert_eq!(result.hosts, vec![host]);
    }

    /// The forwarding plan maps exactly the forwardable secrets.
    #[test]
    fn forwarding_plan_map_matches_secrets(
        entries in proptest::collection::btree_map(
            "[A-Za-z0-9_]{1,30}",
            proptest::option::of("\\PC{0,40}"),
            0..20,
        )
    ) {
        let env: EnvMap = entries;
        let c = classifier();
        let plan = forwarding_plan(&c, &env, None);

        prop_assert_eq!(plan.secrets_map.len(), plan.secrets.len());
        for secret in &plan.secrets {
            prop_assert!(plan.secrets_map.contains_key(&secret.name));
            prop_assert!(!plan.dropped.iter().any(|d| d.name == secret.name));
        }
    }

    /// Normalization leaves patterns without dialect constructs untouched.
    #[test]
    fn normalize_is_identity_on_plain_patterns(source in "[a-z0-9 ^$.+*?|]{0,40}") {
        let normalized = normalize::normalize(&source);
        prop_assert_eq!(normalized.pattern, source);
        prop_assert!(normalized.flags.is_empty());
    }

    /// Normalization never panics on arbitrary input.
    #[test]
    fn normalize_is_total(source in "\\PC*") {
        let _ = normalize::normalize(&source);
    }
}
