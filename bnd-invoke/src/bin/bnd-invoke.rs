//! CLI entry point for bnd-invoke.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// bnd-invoke — run a C header → FFI binding generator from a config file.
#[derive(Parser, Debug)]
#[command(name = "bnd-invoke", version, about)]
struct Cli {
    /// Path to the bnd-invoke.toml configuration file.
    #[arg(default_value = "bnd-invoke.toml")]
    config: PathBuf,

    /// Only generate the binding with this name.
    #[arg(short, long)]
    binding: Option<String>,

    /// Generator program (overrides config).
    #[arg(short, long)]
    generator: Option<String>,

    /// Print the generator command lines without running them.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bnd_invoke=info")),
        )
        .init();

    let cli = Cli::parse();
    let opts = bnd_invoke::RunOptions {
        binding: cli.binding,
        generator: cli.generator,
        dry_run: cli.dry_run,
    };
    bnd_invoke::run(&cli.config, &opts)?;
    Ok(())
}
