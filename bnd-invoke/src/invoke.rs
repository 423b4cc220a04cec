//! Running the external generator against a [`GenerationRequest`].

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::request::GenerationRequest;

/// Anything that accepts an ordered argument vector and reports an exit
/// status.
pub trait Generator {
    /// Name used in logs and error messages.
    fn program(&self) -> String;

    /// Run once with `args` and block until it exits.
    ///
    /// A non-zero exit is still `Ok`; only failing to start is an error.
    fn run(&self, args: &[OsString]) -> Result<ExitStatus>;
}

/// A generator executed as a child process.
///
/// The child inherits the working directory, environment and stdio of the
/// caller. `args` are placed before the request's arguments, which allows
/// running the generator through an interpreter or wrapper script.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    program: PathBuf,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
}

impl ProcessGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    /// Leading arguments plus `args`, as passed to the child.
    fn full_args<'a>(&'a self, args: &'a [OsString]) -> impl Iterator<Item = &'a OsString> {
        self.args.iter().chain(args)
    }
}

impl Default for ProcessGenerator {
    fn default() -> Self {
        Self::new("bindgen")
    }
}

impl Generator for ProcessGenerator {
    fn program(&self) -> String {
        self.program.display().to_string()
    }

    fn run(&self, args: &[OsString]) -> Result<ExitStatus> {
        Command::new(&self.program)
            .args(self.full_args(args))
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .status()
            .map_err(|source| Error::Launch {
                program: self.program(),
                source,
            })
    }
}

/// Outcome of a generator run that managed to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub status: ExitStatus,
}

impl Invocation {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Turn a non-zero exit into [`Error::GeneratorFailure`].
    pub fn check(self, program: impl Into<String>) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::GeneratorFailure {
                program: program.into(),
                status: self.status,
            })
        }
    }
}

/// Run `generator` once for `request` and return its exit status verbatim.
///
/// The output file is neither cleaned up nor inspected afterwards, whatever
/// the outcome.
pub fn generate<G: Generator + ?Sized>(
    generator: &G,
    request: &GenerationRequest,
) -> Result<Invocation> {
    let program = generator.program();
    let args = request.args();

    info!(
        program = %program,
        library = request.library(),
        header = %request.header().display(),
        output = %request.output().display(),
        "invoking binding generator"
    );
    debug!(args = ?args, "generator arguments");

    let status = generator.run(&args)?;
    if status.success() {
        info!(output = %request.output().display(), "generator finished");
    } else {
        warn!(program = %program, %status, "generator exited unsuccessfully");
    }

    Ok(Invocation { status })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records the arguments it was given and reports a canned status.
    struct Recording {
        code: i32,
        seen: RefCell<Vec<Vec<OsString>>>,
    }

    #[cfg(unix)]
    fn exit_status(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    fn exit_status(code: i32) -> ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(code as u32)
    }

    impl Generator for Recording {
        fn program(&self) -> String {
            "recording".to_string()
        }

        fn run(&self, args: &[OsString]) -> Result<ExitStatus> {
            self.seen.borrow_mut().push(args.to_vec());
            Ok(exit_status(self.code))
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::builder()
            .library("mozjs")
            .output("jsapi.rs")
            .filter("js")
            .header("jsapi.h")
            .include_path("dist/include")
            .build()
            .unwrap()
    }

    #[test]
    fn passes_request_args_to_generator() {
        let g = Recording {
            code: 0,
            seen: RefCell::default(),
        };
        let req = request();
        let inv = generate(&g, &req).unwrap();
        assert!(inv.success());
        assert_eq!(g.seen.borrow().as_slice(), [req.args()]);
    }

    #[test]
    fn nonzero_exit_is_reported_not_raised() {
        let g = Recording {
            code: 3,
            seen: RefCell::default(),
        };
        let inv = generate(&g, &request()).unwrap();
        assert!(!inv.success());
        assert_eq!(inv.status.code(), Some(3));

        let err = inv.check(g.program()).unwrap_err();
        assert!(matches!(err, Error::GeneratorFailure { .. }));
        assert!(!err.is_launch());
    }

    #[test]
    fn generator_can_be_a_trait_object() {
        let g: Box<dyn Generator> = Box::new(Recording {
            code: 0,
            seen: RefCell::default(),
        });
        assert!(generate(g.as_ref(), &request()).unwrap().success());
    }

    #[test]
    fn missing_program_is_launch_failure() {
        let g = ProcessGenerator::new("bnd-invoke-no-such-generator");
        let err = generate(&g, &request()).unwrap_err();
        assert!(err.is_launch(), "unexpected error: {err:?}");
    }
}
