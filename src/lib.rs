use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

mod utils;

pub use utils::split_kv;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read env file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write env file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Variable name to raw value, serialized in first-seen order.
///
/// Replacing a value keeps the key where it was; new keys go to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvMapping {
    vars: IndexMap<String, String>,
}

impl EnvMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Sets `key`, returning the value it replaced.
    pub fn set(&mut self, key: String, value: String) -> Option<String> {
        self.vars.insert(key, value)
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

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parses env file text. Only zero-length lines are skipped; nothing is
/// trimmed, quoted or unescaped.
pub fn parse(contents: &str) -> EnvMapping {
    let mut env = EnvMapping::new();
    for line in contents.split('\n').filter(|line| !line.is_empty()) {
        let (key, value) = split_kv(line);
        debug!(key = %key, "loaded variable");
        env.set(key, value);
    }
    env
}

pub fn load(path: &Path) -> Result<EnvMapping> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&contents))
}

/// Applies `KEY=VALUE` overrides in order, so the last one for a key wins.
pub fn apply_overrides<I, S>(env: &mut EnvMapping, overrides: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for pair in overrides {
        let (key, value) = split_kv(pair.as_ref());
        match env.set(key.clone(), value) {
            Some(_) => debug!(key = %key, "replaced variable"),
            None => debug!(key = %key, "added variable"),
        }
    }
}

pub fn serialize(env: &EnvMapping) -> String {
    let mut out = String::new();
    for (key, value) in env.iter() {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }
    out.trim().to_string()
}

pub fn save(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads `path`, applies `overrides` and writes the merged result back.
///
/// The file is only written once the whole merge succeeded in memory.
pub fn update_env_file<I, S>(path: &Path, overrides: I) -> Result<EnvMapping>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut env = load(path)?;
    apply_overrides(&mut env, overrides);
    save(path, &serialize(&env))?;
    info!(path = %path.display(), vars = env.len(), "wrote env file");
    Ok(env)
}
