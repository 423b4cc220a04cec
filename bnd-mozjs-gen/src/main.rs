//! Generator that produces the SpiderMonkey `jsapi.rs` and `glue.rs`
//! bindings.
//!
//! ```sh
//! MOZJS_SRC=../mozjs/js/src MOZJS_GLUE_SRC=../rust-mozjs/src cargo run -p bnd-mozjs-gen
//! ```
//!
//! Pass `--dry-run` to print the generator command lines only.

use anyhow::Result;
use bnd_mozjs_gen::Cli;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts = Cli::parse().run_options();
    for output in bnd_mozjs_gen::generate(&opts)? {
        println!("Generated {}", output.display());
    }
    Ok(())
}
