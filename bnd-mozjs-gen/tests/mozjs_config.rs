//! Checks that `mozjs.toml` expands into the expected generator invocations.

use std::ffi::OsString;
use std::path::Path;

use bnd_mozjs_gen::Cli;
use clap::Parser;

fn strings(args: Vec<OsString>) -> Vec<String> {
    args.into_iter()
        .map(|a| a.into_string().expect("utf-8 arg"))
        .collect()
}

#[test]
fn mozjs_requests() {
    // SAFETY: the only test in this binary touching the environment.
    unsafe {
        std::env::set_var("MOZJS_SRC", "/x");
        std::env::set_var("MOZJS_GLUE_SRC", "/glue/src");
    }

    let reqs = bnd_mozjs_gen::requests().expect("mozjs.toml resolves");
    assert_eq!(reqs.len(), 2);

    let gen_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let jsapi_out = gen_dir.join("jsapi.rs").display().to_string();
    assert_eq!(
        strings(reqs[0].args()),
        [
            "-l",
            "mozjs",
            "-o",
            jsapi_out.as_str(),
            "-match",
            "js",
            "/x/jsapi.h",
            "-I",
            "/x/dist/include",
            "-isystem",
            "/usr/lib/x86_64-linux-gnu/gcc/x86_64-linux-gnu/4.5/include",
            "-isystem",
            "/usr/lib/gcc/x86_64-redhat-linux/4.7.0/include",
        ]
    );

    let glue = &reqs[1];
    assert_eq!(glue.filter(), "glue");
    assert_eq!(glue.header(), Path::new("/glue/src/jsglue.cpp"));
    assert_eq!(glue.include_paths(), [Path::new("/x/dist/include")]);
    assert!(glue.system_include_paths().is_empty());
}

#[test]
fn cli_accepts_dry_run() {
    let opts = Cli::try_parse_from(["bnd-mozjs-gen", "--dry-run", "-b", "glue"])
        .expect("valid flags")
        .run_options();
    assert!(opts.dry_run);
    assert_eq!(opts.binding.as_deref(), Some("glue"));
    assert!(opts.generator.is_none());
}

#[test]
fn cli_rejects_unknown_flag() {
    let err = Cli::try_parse_from(["bnd-mozjs-gen", "--dry-rn"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
}
