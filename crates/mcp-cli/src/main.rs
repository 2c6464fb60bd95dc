//! MCP tool stub generator CLI.
//!
//! Command-line front end that scans MCP servers and writes typed Rust
//! bindings for their tools.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `introspect` - List a server's tools and the names they generate to
//! - `generate` - Write one Rust module per server
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Inspect a server
//! mcp-toolgen introspect npx --arg=-y --arg=@modelcontextprotocol/server-gdrive
//!
//! # Generate bindings for servers configured in ~/.claude/mcp.json
//! mcp-toolgen generate --from-config gdrive --from-config github -o src/mcp
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use mcp_toolgen_cli::commands::{self, generate::GenerateArgs, introspect::IntrospectArgs};
use mcp_toolgen_core::cli::{ExitCode, OutputFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Generates typed Rust stubs for MCP server tools.
#[derive(Parser, Debug)]
#[command(name = "mcp-toolgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Introspect an MCP server and show its tools.
    ///
    /// Connects to the server, lists its tools and prints the qualified
    /// name and generated function name of each one.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Docker container
    /// mcp-toolgen introspect docker --arg=run --arg=-i --arg=--rm \
    ///     --arg=ghcr.io/github/github-mcp-server \
    ///     --env=GITHUB_PERSONAL_ACCESS_TOKEN=ghp_xxx
    ///
    /// # From mcp.json, with parameter details
    /// mcp-toolgen introspect --from-config github --detailed
    /// ```
    Introspect(IntrospectArgs),

    /// Generate Rust bindings from one or more MCP servers.
    ///
    /// Every server becomes a module with `mod.rs`, `client.rs` and
    /// `tools.rs` under the output directory. Files that already exist
    /// with different content are left alone unless `--overwrite` is set.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Several servers from mcp.json
    /// mcp-toolgen generate --from-config gdrive --from-config github -o src/mcp
    ///
    /// # Offline, from a saved tools/list response
    /// mcp-toolgen generate --tools-file gdrive.json --dry-run
    /// ```
    Generate(GenerateArgs),

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose, cli.log_json) {
        eprintln!("{} {err:#}", "warning:".yellow().bold());
    }

    let exit_code = match execute(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging on stderr.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, falling
/// back to `info`.
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

/// Routes the parsed command to its handler.
async fn execute(cli: Cli) -> Result<ExitCode> {
    let output_format = cli.format.parse::<OutputFormat>()?;

    match cli.command {
        Commands::Introspect(args) => commands::introspect::run(args, output_format).await,
        Commands::Generate(args) => commands::generate::run(args, output_format).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            Ok(commands::completions::run(shell, &mut cmd))
        }
    }
}

/// Maps a command failure to an exit code, looking through context layers
/// for a library error.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    err.downcast_ref::<mcp_toolgen_core::Error>()
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}
