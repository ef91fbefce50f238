// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use prebill_app::KeyValueStore;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One JSON file per key under a state directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("create state directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error).with_context(|| format!("read {}", path.display())),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut temp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("create temp file in {}", self.dir.display()))?;
        temp.write_all(value.as_bytes())
            .with_context(|| format!("write temp file for {key}"))?;
        temp.persist(&path)
            .map_err(|error| error.error)
            .with_context(|| format!("replace {}", path.display()))?;
        tracing::debug!(key, path = %path.display(), "state saved");
        Ok(())
    }
}

/// Keys become file names, so only a conservative character set is allowed.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        bail!("storage key must not be empty");
    }
    if let Some(bad) = key
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-'))
    {
        bail!("storage key {key:?} contains {bad:?}; use letters, digits, '_' or '-'");
    }
    Ok(())
}

/// Process-lifetime storage; nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
