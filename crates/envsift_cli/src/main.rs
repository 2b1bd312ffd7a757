//! # Commands
//!
//! - `envsift inspect` - Classify the process environment or a dotenv file
//! - `envsift patterns` - List the bundled detection rules
//! - `envsift completions` - Generate shell completion scripts

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use clap_complete::Shell;
use console::style;
pub use envsift_core::CONFIG_FILENAME;

use crate::ui::colors;

const REPO_URL: &str = "https://github.com/envsift/envsift";

#[derive(Debug, Parser)]
#[command(
    name = "envsift",
    version,
    styles = ui::clap_styles(),
    arg_required_else_help = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    #[command(visible_alias = "p")]
    Patterns(PatternsArgs),

    Completions(CompletionsArgs),
}

/// Arguments for the `envsift inspect` command.
#[derive(Debug, Parser)]
pub struct InspectArgs {
    /// Inspect a dotenv file instead of the process environment.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Expand `${VAR}` interpolation when reading a dotenv file.
    #[arg(long, requires = "file")]
    pub expand: bool,

    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// Include safe variable names in text output.
    #[arg(long)]
    pub show_safe: bool,

    /// Include plaintext secret values in JSON output (dangerous).
    #[arg(long)]
    pub include_secret_values: bool,

    /// Path to `.envsift.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `envsift patterns` command.
#[derive(Debug, Parser)]
pub struct PatternsArgs {
    /// Filter rules by provider keyword.
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Show rule details including the compiled regex.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the `envsift completions` command.
#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}

fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).without_time())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let cli = parse_cli();

    if let Err(e) = run(cli.command) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(ui::exit::ERROR);
    }
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    Cli::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Inspect(args) => commands::inspect::run(&args),
        Command::Patterns(args) => commands::patterns::run(args.keyword.as_deref(), args.verbose),
        Command::Completions(args) => commands::completions::run(args.shell, &mut Cli::command()),
    }
}

fn build_about() -> String {
    format!(
        r"
  {} classifies environment variables as credentials or safe
  configuration and maps each credential to the hosts that may
  legitimately receive it. Works offline. Zero configuration.",
        colors::accent().apply_to("envsift").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    envsift inspect                        Classify the current environment
    envsift inspect --show-safe            Also list safe variable names
    envsift inspect --file .env            Classify a dotenv file
    envsift inspect --file .env --json     Output as JSON
    envsift patterns                       List detection rules
    envsift patterns --keyword github      Rules for one provider

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}
