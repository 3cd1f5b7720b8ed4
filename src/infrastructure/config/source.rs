//! Raw environment assembly.
//!
//! Precedence (lowest to highest):
//! 1. `.env`
//! 2. `.env.<mode>`
//! 3. `.env.local` (skipped in `test` mode so test runs stay reproducible)
//! 4. `.env.<mode>.local`
//! 5. Process environment

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::schema::keys;
use crate::domain::models::NodeEnv;
use crate::domain::ConfigError;

/// Raw `KEY -> value` strings, before any validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEnvironment {
    vars: BTreeMap<String, String>,
}

impl RawEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Present with a non-empty value
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    /// Merge `other` on top of `self`; `other` wins on conflicts
    #[must_use]
    pub fn overlay(mut self, other: Self) -> Self {
        self.vars.extend(other.vars);
        self
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawEnvironment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RawEnvironment {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.vars
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

/// Layered dotenv files for one mode
#[derive(Debug, Clone)]
pub struct EnvFiles {
    dir: PathBuf,
    mode: NodeEnv,
}

impl EnvFiles {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            mode: NodeEnv::default(),
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: NodeEnv) -> Self {
        self.mode = mode;
        self
    }

    /// Candidate files, lowest priority first
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mode = self.mode.as_str();
        let mut names = vec![".env".to_string(), format!(".env.{mode}")];
        if self.mode != NodeEnv::Test {
            names.push(".env.local".to_string());
        }
        names.push(format!(".env.{mode}.local"));

        names.into_iter().map(|name| self.dir.join(name)).collect()
    }

    /// Read every existing candidate and layer them. Missing files are fine.
    pub fn load(&self) -> Result<RawEnvironment, ConfigError> {
        let mut merged = RawEnvironment::new();

        for path in self.candidates() {
            if !path.is_file() {
                continue;
            }
            let layer = read_env_file(&path)?;
            tracing::debug!(path = %path.display(), vars = layer.len(), "loaded env file");
            merged = merged.overlay(layer);
        }

        Ok(merged)
    }
}

fn read_env_file(path: &Path) -> Result<RawEnvironment, ConfigError> {
    let to_error = |err: dotenv::Error| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let mut layer = RawEnvironment::new();
    for entry in dotenv::from_path_iter(path).map_err(to_error)? {
        let (key, value) = entry.map_err(to_error)?;
        layer.set(key, value);
    }
    Ok(layer)
}

/// Process environment layered over the env files found in `env_dir`.
///
/// The mode comes from the process `NODE_ENV`; an unrecognised value picks
/// the development files and is left for validation to report.
pub fn assemble(env_dir: Option<&Path>) -> Result<RawEnvironment, ConfigError> {
    let process = RawEnvironment::from_process();

    let Some(dir) = env_dir else {
        return Ok(process);
    };

    let mode = process
        .get(keys::NODE_ENV)
        .and_then(NodeEnv::from_name)
        .unwrap_or_default();

    let files = EnvFiles::new(dir).mode(mode).load()?;
    Ok(files.overlay(process))
}
