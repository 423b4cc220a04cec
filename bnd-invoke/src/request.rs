//! The generation request — one header, one output file, one invocation.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Immutable description of a single binding-generation run.
///
/// Built with [`GenerationRequest::builder`]. The argument vector produced by
/// [`GenerationRequest::args`] follows the generator's fixed grammar:
///
/// ```text
/// -l <library> -o <output> -match <filter> <header> [-I <dir>]... [-isystem <dir>]...
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    library: String,
    output: PathBuf,
    filter: String,
    header: PathBuf,
    include_paths: Vec<PathBuf>,
    system_include_paths: Vec<PathBuf>,
}

impl GenerationRequest {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn header(&self) -> &Path {
        &self.header
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn system_include_paths(&self) -> &[PathBuf] {
        &self.system_include_paths
    }

    /// The generator's argument vector, not including the program name.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(
            7 + 2 * (self.include_paths.len() + self.system_include_paths.len()),
        );
        args.push("-l".into());
        args.push(self.library.as_str().into());
        args.push("-o".into());
        args.push(self.output.as_os_str().to_owned());
        args.push("-match".into());
        args.push(self.filter.as_str().into());
        args.push(self.header.as_os_str().to_owned());
        for dir in &self.include_paths {
            args.push("-I".into());
            args.push(dir.as_os_str().to_owned());
        }
        for dir in &self.system_include_paths {
            args.push("-isystem".into());
            args.push(dir.as_os_str().to_owned());
        }
        args
    }

    /// Render `program` followed by this request's arguments as a shell-like
    /// command line. Only meant for logs and dry runs.
    pub fn command_line<'a>(&'a self, program: &'a str) -> CommandLine<'a> {
        CommandLine {
            program,
            request: self,
        }
    }
}

/// Display adapter returned by [`GenerationRequest::command_line`].
pub struct CommandLine<'a> {
    program: &'a str,
    request: &'a GenerationRequest,
}

impl fmt::Display for CommandLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_word(f, OsStr::new(self.program))?;
        for arg in self.request.args() {
            f.write_str(" ")?;
            write_word(f, &arg)?;
        }
        Ok(())
    }
}

fn write_word(f: &mut fmt::Formatter<'_>, word: &OsStr) -> fmt::Result {
    let s = word.to_string_lossy();
    if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        f.write_str(&s)
    } else {
        write!(f, "'{}'", s.replace('\'', r"'\''"))
    }
}

/// Builder for [`GenerationRequest`].
#[derive(Debug, Default, Clone)]
pub struct RequestBuilder {
    library: Option<String>,
    output: Option<PathBuf>,
    filter: String,
    header: Option<PathBuf>,
    include_paths: Vec<PathBuf>,
    system_include_paths: Vec<PathBuf>,
}

impl RequestBuilder {
    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Symbol filter. Passed to the generator unmodified; defaults to empty.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn header(mut self, header: impl Into<PathBuf>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn include_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_paths.push(dir.into());
        self
    }

    pub fn include_paths<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_paths.extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn system_include_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.system_include_paths.push(dir.into());
        self
    }

    pub fn system_include_paths<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.system_include_paths
            .extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<GenerationRequest, ConfigError> {
        let library = self
            .library
            .filter(|l| !l.is_empty())
            .ok_or(ConfigError::MissingField("library"))?;
        if library.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidLibrary(library));
        }
        let output = self
            .output
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingField("output"))?;
        let header = self
            .header
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingField("header"))?;

        Ok(GenerationRequest {
            library,
            output,
            filter: self.filter,
            header,
            include_paths: self.include_paths,
            system_include_paths: self.system_include_paths,
        })
    }
}
