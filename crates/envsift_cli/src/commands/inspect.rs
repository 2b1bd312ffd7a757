//! Inspect command - classifies an environment or dotenv file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use envsift_core::dotenv::{ParseDotenvOptions, parse_dotenv};
use envsift_core::prelude::*;

use crate::InspectArgs;
use crate::ui::{colors, indicators, pluralise_word, print_command_header, print_warning};

const REDACTED: &str = "[REDACTED]";
const MAX_PARSE_WARNINGS: usize = 10;

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    parse_errors: &'a [String],
    secret_values_included: bool,
    secrets: &'a [ClassifyResult],
    dropped: &'a [ClassifyResult],
    safe: &'a [String],
    secrets_map: BTreeMap<&'a str, SecretSpec>,
}

/// Classifies the process environment or a dotenv file and prints the
/// forwarding plan.
pub fn run(args: &InspectArgs) -> super::Result {
    let store = PatternStore::shared()?;
    let classifier = Classifier::new(store);

    let config = load_config(args.config.as_deref())?;
    let options = config.to_classify_options();

    let (env, parse_errors) = match args.file.as_deref() {
        Some(path) => read_dotenv_env(path, args.expand)?,
        None => (process_env(), Vec::new()),
    };

    let plan = forwarding_plan(&classifier, &env, Some(&options));

    if args.json {
        print_json(args, &plan, &parse_errors)
    } else {
        print_text(args, &plan, &parse_errors);
        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(|| Path::new(crate::CONFIG_FILENAME));
    Ok(Config::load(path)?)
}

/// Snapshot of the process environment. Names that are not valid UTF-8
/// are skipped; values that are not valid UTF-8 are treated as undefined.
fn process_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(name, value)| {
            let name = name.into_string().ok()?;
            Some((name, value.into_string().ok()))
        })
        .collect()
}

fn read_dotenv_env(path: &Path, expand: bool) -> anyhow::Result<(EnvMap, Vec<String>)> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))?;

    let parsed = parse_dotenv(&content, ParseDotenvOptions { expand });
    let env = parsed.values.into_iter().map(|(name, value)| (name, Some(value))).collect();
    Ok((env, parsed.errors))
}

fn print_json(args: &InspectArgs, plan: &ForwardingPlan, parse_errors: &[String]) -> super::Result {
    let secrets_map: BTreeMap<&str, SecretSpec> = plan
        .secrets_map
        .iter()
        .map(|(name, spec)| {
            let value = if args.include_secret_values {
                spec.value.clone()
            } else {
                REDACTED.to_string()
            };
            (
                name.as_str(),
                SecretSpec {
                    hosts: spec.hosts.clone(),
                    value,
                },
            )
        })
        .collect();

    let report = JsonReport {
        source: if args.file.is_some() { "file" } else { "env" },
        file: args.file.as_deref().map(|p| p.display().to_string()),
        parse_errors,
        secret_values_included: args.include_secret_values,
        secrets: &plan.secrets,
        dropped: &plan.dropped,
        safe: &plan.safe,
        secrets_map,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_text(args: &InspectArgs, plan: &ForwardingPlan, parse_errors: &[String]) {
    print_command_header("inspect");

    if let Some(path) = args.file.as_deref() {
        println!(
            "{} {}",
            colors::muted().apply_to("source:"),
            colors::emphasis().apply_to(path.display())
        );
        print_parse_warnings(parse_errors);
        println!();
    }

    print_secrets(plan);
    println!();
    print_dropped(plan);
    println!();
    print_safe(plan, args.show_safe);
}

fn print_parse_warnings(parse_errors: &[String]) {
    if parse_errors.is_empty() {
        return;
    }

    let label = pluralise_word(parse_errors.len(), "warning", "warnings");
    print_warning(&format!("{} parse {label}", parse_errors.len()));

    for warning in parse_errors.iter().take(MAX_PARSE_WARNINGS) {
        eprintln!("  {}", colors::muted().apply_to(warning));
    }
    if parse_errors.len() > MAX_PARSE_WARNINGS {
        eprintln!(
            "  {}",
            colors::muted().apply_to(format!("... and {} more", parse_errors.len() - MAX_PARSE_WARNINGS))
        );
    }
}

fn print_secrets(plan: &ForwardingPlan) {
    println!(
        "{} {} {}",
        colors::success().apply_to(indicators::SUCCESS),
        colors::primary().apply_to("mapped secrets:"),
        colors::secondary().apply_to(plan.secrets.len())
    );

    for entry in &plan.secrets {
        println!(
            "  - {}{} {} {}",
            colors::accent().apply_to(&entry.name),
            colors::muted().apply_to(match_source_suffix(entry)),
            colors::muted().apply_to("->"),
            colors::secondary().apply_to(entry.hosts.join(", "))
        );
    }
}

fn print_dropped(plan: &ForwardingPlan) {
    println!(
        "{} {} {}",
        colors::error().apply_to(indicators::ERROR),
        colors::primary().apply_to("dropped secrets:"),
        colors::secondary().apply_to(plan.dropped.len())
    );

    for entry in &plan.dropped {
        let reason = entry.reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default();
        println!(
            "  - {}{}{}",
            colors::accent().apply_to(&entry.name),
            colors::muted().apply_to(match_source_suffix(entry)),
            colors::secondary().apply_to(reason)
        );
    }
}

fn print_safe(plan: &ForwardingPlan, show_safe: bool) {
    println!(
        "{} {}",
        colors::primary().apply_to("safe vars:"),
        colors::secondary().apply_to(plan.safe.len())
    );

    if show_safe {
        for name in &plan.safe {
            println!("  - {}", colors::muted().apply_to(name));
        }
    }
}

fn match_source_suffix(entry: &ClassifyResult) -> String {
    entry.matched_by.map(|source| format!(" ({source})")).unwrap_or_default()
}
