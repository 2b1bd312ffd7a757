//! Patterns command - lists the bundled detection rules.

use envsift_core::prelude::*;
use envsift_core::store::CompiledPattern;

use crate::ui::{colors, print_command_header, truncate_with_ellipsis};

const REGEX_TRUNCATE_WIDTH: usize = 70;

/// Lists value-pattern rules, optionally filtered by provider keyword.
pub fn run(keyword_filter: Option<&str>, verbose: bool) -> super::Result {
    print_command_header("patterns");

    let store = PatternStore::shared()?;
    let rules = filter_rules(store.compiled_patterns(), keyword_filter);

    if rules.is_empty() {
        print_no_matches(keyword_filter);
        return Ok(());
    }

    print_dataset_summary(store);
    println!();

    for rule in &rules {
        if verbose {
            print_rule_detail(store, rule);
        } else {
            print_rule_row(rule);
        }
    }

    Ok(())
}

fn filter_rules<'a>(rules: &'a [CompiledPattern], keyword: Option<&str>) -> Vec<&'a CompiledPattern> {
    rules
        .iter()
        .filter(|rule| {
            keyword.is_none_or(|filter| {
                rule.keyword
                    .as_deref()
                    .is_some_and(|k| k.eq_ignore_ascii_case(filter))
            })
        })
        .collect()
}

fn print_no_matches(keyword: Option<&str>) {
    match keyword {
        Some(filter) => println!(
            "{} {} {}",
            colors::muted().apply_to("○"),
            colors::secondary().apply_to("no rules match"),
            colors::emphasis().apply_to(format!("--keyword {filter}"))
        ),
        None => println!(
            "{} {}",
            colors::muted().apply_to("○"),
            colors::secondary().apply_to("no rules")
        ),
    }
}

fn print_dataset_summary(store: &PatternStore) {
    let dataset = store.dataset();
    println!(
        "{}",
        colors::muted().apply_to(format!(
            "{} rules · {} provider keywords · {} exact names · dataset v{} ({})",
            store.compiled_patterns().len(),
            dataset.keyword_host_map.len(),
            dataset.exact_name_host_map.len(),
            dataset.schema_version,
            format_generated_at(&dataset.generated_at),
        ))
    );
}

fn format_generated_at(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn print_rule_row(rule: &CompiledPattern) {
    println!(
        "  {}  {}",
        colors::accent().apply_to(&rule.id),
        colors::secondary().apply_to(rule.keyword.as_deref().unwrap_or("-"))
    );
}

fn print_rule_detail(store: &PatternStore, rule: &CompiledPattern) {
    println!();
    println!("{}", console::style(&rule.id).bold());

    if let Some(keyword) = rule.keyword.as_deref() {
        let hosts = store
            .dataset()
            .keyword_host_map
            .get(keyword)
            .map(|hosts| hosts.join(", "))
            .unwrap_or_else(|| "(no host mapping)".to_string());
        println!(
            "  {} {} {} {}",
            colors::muted().apply_to("keyword:"),
            colors::secondary().apply_to(keyword),
            colors::muted().apply_to("->"),
            colors::secondary().apply_to(hosts)
        );
    }

    println!(
        "  {} {}",
        colors::muted().apply_to("regex:"),
        colors::secondary().apply_to(truncate_with_ellipsis(rule.matcher.as_str(), REGEX_TRUNCATE_WIDTH))
    );
}
