//! Configuration types for `bnd-invoke.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::invoke::ProcessGenerator;
use crate::request::GenerationRequest;

/// Root configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Named sets of compiler system include directories.
    #[serde(default)]
    pub profile: BTreeMap<String, ProfileConfig>,
    #[serde(default)]
    pub binding: Vec<BindingConfig>,
}

/// Which executable performs the translation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Program name (looked up on `PATH`) or path.
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before every request's arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment for the generator (e.g. `DYLD_LIBRARY_PATH` for
    /// its libclang).
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }
}

fn default_program() -> String {
    "bindgen".to_string()
}

/// A toolchain-specific set of system include directories.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub system_include_paths: Vec<String>,
}

/// One header → one bindings file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    pub name: String,
    /// Native library the bindings link against (`-l`).
    pub library: String,
    pub output: String,
    /// Symbol filter (`-match`). Passed through unmodified.
    #[serde(default)]
    pub filter: String,
    pub header: String,
    #[serde(default)]
    pub include_paths: Vec<String>,
    /// Profiles whose system include paths come first, in listed order.
    #[serde(default)]
    pub profiles: Vec<String>,
    #[serde(default)]
    pub system_include_paths: Vec<String>,
}

impl Config {
    /// Build the generator described by `[generator]`.
    ///
    /// `${VAR}` references in the program, its arguments and environment
    /// values are expanded.
    pub fn generator(&self) -> Result<ProcessGenerator, ConfigError> {
        let g = &self.generator;
        let mut generator = ProcessGenerator::new(expand_env(&g.program)?);
        for arg in &g.args {
            generator = generator.arg(expand_env(arg)?);
        }
        for (key, value) in &g.env {
            generator = generator.env(key, expand_env(value)?);
        }
        Ok(generator)
    }

    pub fn find_binding(&self, name: &str) -> Result<&BindingConfig, ConfigError> {
        self.binding
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ConfigError::UnknownBinding(name.to_string()))
    }

    /// One request per `[[binding]]`, in file order.
    pub fn requests(&self, base_dir: &Path) -> Result<Vec<GenerationRequest>, ConfigError> {
        self.binding
            .iter()
            .map(|b| self.request_for(b, base_dir))
            .collect()
    }

    /// Resolve a single binding into a [`GenerationRequest`].
    ///
    /// Relative paths are taken relative to `base_dir`, the directory holding
    /// the TOML file.
    pub fn request_for(
        &self,
        binding: &BindingConfig,
        base_dir: &Path,
    ) -> Result<GenerationRequest, ConfigError> {
        self.request_with(binding, base_dir, |name| std::env::var(name).ok())
    }

    fn request_with(
        &self,
        binding: &BindingConfig,
        base_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<GenerationRequest, ConfigError> {
        let resolve = |s: &str| -> Result<PathBuf, ConfigError> {
            let expanded = expand_with(s, &lookup)?;
            Ok(resolve_path(Path::new(&expanded), base_dir))
        };

        let mut system_include_paths = Vec::new();
        for name in &binding.profiles {
            let profile = self
                .profile
                .get(name)
                .ok_or_else(|| ConfigError::UnknownProfile {
                    binding: binding.name.clone(),
                    profile: name.clone(),
                })?;
            for dir in &profile.system_include_paths {
                system_include_paths.push(resolve(dir)?);
            }
        }
        for dir in &binding.system_include_paths {
            system_include_paths.push(resolve(dir)?);
        }

        let include_paths = binding
            .include_paths
            .iter()
            .map(|dir| resolve(dir))
            .collect::<Result<Vec<_>, _>>()?;

        // Checked after expansion; an empty value stays empty so the builder
        // reports it as missing instead of resolving to `base_dir`.
        let resolve_required = |s: &str| -> Result<PathBuf, ConfigError> {
            let expanded = expand_with(s, &lookup)?;
            if expanded.is_empty() {
                Ok(PathBuf::new())
            } else {
                Ok(resolve_path(Path::new(&expanded), base_dir))
            }
        };

        GenerationRequest::builder()
            .library(expand_with(&binding.library, &lookup)?)
            .output(resolve_required(&binding.output)?)
            .filter(binding.filter.clone())
            .header(resolve_required(&binding.header)?)
            .include_paths(include_paths)
            .system_include_paths(system_include_paths)
            .build()
    }
}

/// Resolve a path relative to `base_dir` unless it is already absolute.
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Replace every `${NAME}` in `s` with the value of the environment variable
/// `NAME`. `$` not followed by `{` is kept literally.
pub fn expand_env(s: &str) -> Result<String, ConfigError> {
    expand_with(s, |name| std::env::var(name).ok())
}

fn expand_with(s: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| ConfigError::UnterminatedVariable(s.to_string()))?;
        let name = &after[..end];
        let value = lookup(name).ok_or_else(|| ConfigError::UnsetVariable(name.to_string()))?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Load and parse a `bnd-invoke.toml` configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}
