//! Core generation logic for the SpiderMonkey bindings.

use std::path::{Path, PathBuf};

use anyhow::Result;
use bnd_invoke::{GenerationRequest, RunOptions, config};
use clap::Parser;

/// bnd-mozjs-gen — regenerate the SpiderMonkey `jsapi.rs` and `glue.rs`.
#[derive(Parser, Debug)]
#[command(name = "bnd-mozjs-gen", version, about)]
pub struct Cli {
    /// Only generate the binding with this name (`jsapi` or `glue`).
    #[arg(short, long)]
    pub binding: Option<String>,

    /// Print the generator command lines without running them.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn run_options(self) -> RunOptions {
        RunOptions {
            binding: self.binding,
            generator: None,
            dry_run: self.dry_run,
        }
    }
}

/// Path of the checked-in `mozjs.toml`.
pub fn config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("mozjs.toml")
}

/// Regenerate `jsapi.rs` and `glue.rs` next to `mozjs.toml`.
///
/// Needs `MOZJS_SRC` and `MOZJS_GLUE_SRC` in the environment and the
/// generator on `PATH`.
pub fn generate(opts: &RunOptions) -> Result<Vec<PathBuf>> {
    bnd_invoke::run(&config_path(), opts)
}

/// The requests `generate` would run, without running them.
pub fn requests() -> Result<Vec<GenerationRequest>> {
    let path = config_path();
    let cfg = config::load_config(&path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(cfg.requests(base_dir)?)
}
