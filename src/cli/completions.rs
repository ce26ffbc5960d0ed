use crate::errors::Result;
use clap::Command;
use clap_complete::{generate, Shell};

/// Print a completion script for the given shell
///
/// ```bash
/// ec completions bash > ~/.local/share/bash-completion/completions/ec
/// ```
pub fn run(shell: Shell, command: &mut Command) -> Result<()> {
    let name = command.get_name().to_string();
    generate(shell, command, name, &mut std::io::stdout());
    Ok(())
}
