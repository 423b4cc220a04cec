//! bnd-invoke — drive a C header → FFI binding generator.
//!
//! Translates a handful of environment-specific facts (header location,
//! include search paths, compiler system include paths, library name, output
//! path, symbol filter) into one correctly ordered invocation of an external
//! generator such as `bindgen`.
//!
//! # Quick start
//!
//! Run every binding listed in a config (suitable for `build.rs`):
//!
//! ```no_run
//! use std::path::Path;
//!
//! bnd_invoke::run(Path::new("bnd-invoke.toml"), &Default::default()).unwrap();
//! ```
//!
//! Or build a request by hand:
//!
//! ```no_run
//! use bnd_invoke::{GenerationRequest, ProcessGenerator, generate};
//!
//! let request = GenerationRequest::builder()
//!     .library("mozjs")
//!     .output("jsapi.rs")
//!     .filter("js")
//!     .header("../mozjs/js/src/jsapi.h")
//!     .include_path("../mozjs/js/src/dist/include")
//!     .build()
//!     .unwrap();
//! let invocation = generate(&ProcessGenerator::default(), &request).unwrap();
//! assert!(invocation.success());
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub mod config;
pub mod error;
pub mod invoke;
pub mod request;

pub use error::{ConfigError, Error};
pub use invoke::{Generator, Invocation, ProcessGenerator, generate};
pub use request::{GenerationRequest, RequestBuilder};

/// Overrides applied on top of a loaded configuration.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Only run the binding with this name.
    pub binding: Option<String>,
    /// Replace `[generator].program`. Only read by [`run`];
    /// [`run_from_config`] uses the generator it is given.
    pub generator: Option<String>,
    /// Print the command lines instead of running them.
    pub dry_run: bool,
}

/// Run the full pipeline: load config, build one request per binding and
/// invoke the generator for each, in file order.
///
/// Stops at the first binding that fails. Returns the output paths of the
/// bindings that were generated (or would have been, for a dry run).
pub fn run(config_path: &Path, opts: &RunOptions) -> Result<Vec<PathBuf>> {
    let mut cfg = config::load_config(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    if let Some(program) = &opts.generator {
        cfg.generator.program = program.clone();
    }

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let generator = cfg.generator()?;

    run_from_config(&cfg, base_dir, &generator, opts)
}

/// Invoke `generator` for the bindings of an already-loaded
/// [`config::Config`].
///
/// `base_dir` is the directory relative to which paths in the config are
/// resolved (typically the parent directory of the TOML file).
/// `opts.generator` is ignored here.
pub fn run_from_config<G: Generator + ?Sized>(
    cfg: &config::Config,
    base_dir: &Path,
    generator: &G,
    opts: &RunOptions,
) -> Result<Vec<PathBuf>> {
    let bindings = match &opts.binding {
        Some(name) => vec![cfg.find_binding(name)?],
        None => cfg.binding.iter().collect(),
    };

    info!(
        program = %generator.program(),
        bindings = bindings.len(),
        profiles = cfg.profile.len(),
        "loaded configuration"
    );

    let mut outputs = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let request = cfg
            .request_for(binding, base_dir)
            .with_context(|| format!("binding `{}`", binding.name))?;

        if opts.dry_run {
            let line = request.command_line(&generator.program()).to_string();
            info!(binding = %binding.name, "dry run: {line}");
            println!("{line}");
        } else {
            generate(generator, &request)
                .and_then(|inv| inv.check(generator.program()))
                .with_context(|| format!("generating binding `{}`", binding.name))?;
        }
        outputs.push(request.output().to_path_buf());
    }

    Ok(outputs)
}
