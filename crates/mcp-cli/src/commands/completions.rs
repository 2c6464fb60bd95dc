//! Shell completion generation command.
//!
//! Generates completion scripts for bash, zsh, fish, elvish and `PowerShell`.

use clap::Command;
use clap_complete::{Shell, generate};
use mcp_toolgen_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::debug;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use mcp_toolgen_cli::commands::completions::write_completions;
///
/// let mut script = Vec::new();
/// write_completions(Shell::Bash, &mut Command::new("mcp-toolgen"), &mut script);
/// assert!(String::from_utf8(script).unwrap().contains("mcp-toolgen"));
/// ```
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    debug!("Generating {} completions", shell);
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
pub fn run(shell: Shell, cmd: &mut Command) -> ExitCode {
    write_completions(shell, cmd, &mut io::stdout());
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn command() -> Command {
        Command::new("mcp-toolgen")
            .subcommand(Command::new("generate").arg(Arg::new("output").long("output")))
    }

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        write_completions(shell, &mut command(), &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("mcp-toolgen"));
        assert!(bash.contains("generate"));
    }

    #[test]
    fn test_other_shells_produce_output() {
        for shell in [Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            assert!(!script(shell).is_empty(), "{shell} produced no script");
        }
    }
}
