//! Error types for request validation and generator invocation.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// A request or configuration that cannot be turned into an invocation.
///
/// These are detected before any child process is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid library name {0:?}")]
    InvalidLibrary(String),
    #[error("binding `{binding}` references unknown profile `{profile}`")]
    UnknownProfile { binding: String, profile: String },
    #[error("environment variable `{0}` is not set")]
    UnsetVariable(String),
    #[error("unterminated `${{` in {0:?}")]
    UnterminatedVariable(String),
    #[error("no binding named `{0}` in configuration")]
    UnknownBinding(String),
}

#[derive(Debug, Error)]
pub enum Error {
    /// The generator executable could not be found or started.
    #[error("failed to launch generator `{program}`")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The generator ran and exited unsuccessfully.
    #[error("generator `{program}` failed: {status}")]
    GeneratorFailure { program: String, status: ExitStatus },
}

impl Error {
    /// True for [`Error::Launch`].
    pub fn is_launch(&self) -> bool {
        matches!(self, Error::Launch { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
