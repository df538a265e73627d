//! Command-line harness for wiremap.
//!
//! `wiremap generate --ir service.yaml --out src/generated` loads the IR
//! document and generator options, runs every generator for the selected
//! role and writes the artifacts below the output directory.

use std::ffi::OsString;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod cli;

/// Crates whose events are shown by default.
const LOG_TARGETS: [&str; 3] = ["wiremap_cli", "wiremap_core", "wiremap_ir"];

#[derive(Debug, Parser)]
#[command(
    name = "wiremap",
    version,
    about = "Generate TypeScript types, DTOs, mappers and routes from a service IR"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate TypeScript artifacts from an IR document
    Generate(cli::generate::GenerateArgs),
}

/// Parse `args` (program name first) and run the selected command,
/// returning the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => cli::generate::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Install the stderr fmt subscriber.
///
/// WIREMAP_LOG controls the level: "trace", "debug", "info", "warn",
/// "error", or a full tracing filter spec like "wiremap_core=debug".
pub fn init_tracing() {
    let filter = filter_spec(std::env::var("WIREMAP_LOG").ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn filter_spec(env: Option<&str>) -> String {
    match env {
        Some(spec) if !is_plain_level(spec) => spec.to_string(),
        Some(level) => per_target(&level.to_ascii_lowercase()),
        None => per_target("warn"),
    }
}

fn per_target(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
