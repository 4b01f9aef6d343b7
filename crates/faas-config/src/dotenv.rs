//! Minimal `.env` file support
//!
//! One `KEY=VALUE` per line. Blank lines and lines starting with `#` are
//! skipped, keys and values are trimmed, and a value wrapped in matching
//! single or double quotes has the quotes removed. Lines without `=` are
//! ignored. Later assignments of the same key win.

use crate::error::ConfigResult;
use faas_core::ConfigSource;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotEnv {
    vars: HashMap<String, String>,
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

impl DotEnv {
    pub fn parse(content: &str) -> Self {
        let mut vars = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            vars.insert(key.to_string(), unquote(value.trim()).to_string());
        }
        Self { vars }
    }

    /// Read `path`. A missing file yields an empty set, other IO errors fail.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let env = Self::parse(&content);
                tracing::debug!(path = %path.display(), vars = env.len(), "Loaded env file");
                Ok(env)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No env file");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
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

impl ConfigSource for DotEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
