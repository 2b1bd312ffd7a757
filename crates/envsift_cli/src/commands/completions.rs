//! Completions command - generates shell completion scripts.

use clap::Command;
use clap_complete::{Shell, generate};

/// Writes a completion script for `shell` to stdout.
pub fn run(shell: Shell, cmd: &mut Command) -> super::Result {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut std::io::stdout());
    Ok(())
}
