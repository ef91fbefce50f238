// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use anyhow::{Context, Result};

pub const EXPANDED_STORAGE_KEY: &str = "prebill_expanded";

/// String key-value storage for small UI preferences.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Which client groups are expanded on the landing view. Names missing from
/// the map are collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpandedGroups {
    groups: BTreeMap<String, bool>,
}

impl ExpandedGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn try_load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        let Some(raw) = store
            .read(EXPANDED_STORAGE_KEY)
            .with_context(|| format!("read {EXPANDED_STORAGE_KEY}"))?
        else {
            return Ok(None);
        };
        let groups: BTreeMap<String, bool> = serde_json::from_str(&raw)
            .with_context(|| format!("parse stored {EXPANDED_STORAGE_KEY}"))?;
        Ok(Some(Self { groups }))
    }

    /// Like [`Self::try_load`], but any failure starts from all collapsed.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match Self::try_load(store) {
            Ok(Some(groups)) => groups,
            Ok(None) => Self::default(),
            Err(error) => {
                tracing::warn!("discarding stored group state: {error:#}");
                Self::default()
            }
        }
    }

    pub fn is_expanded(&self, client: &str) -> bool {
        self.groups.get(client).copied().unwrap_or(false)
    }

    /// Flips one group and persists the whole map. Returns the new value.
    pub fn toggle(&mut self, client: &str, store: &mut dyn KeyValueStore) -> bool {
        let expanded = !self.is_expanded(client);
        self.groups.insert(client.to_owned(), expanded);
        self.persist(store);
        expanded
    }

    pub fn expand_all<'a>(
        &mut self,
        clients: impl IntoIterator<Item = &'a str>,
        store: &mut dyn KeyValueStore,
    ) {
        for client in clients {
            self.groups.insert(client.to_owned(), true);
        }
        self.persist(store);
    }

    pub fn collapse_all(&mut self, store: &mut dyn KeyValueStore) {
        self.groups.clear();
        self.persist(store);
    }

    pub fn entries(&self) -> &BTreeMap<String, bool> {
        &self.groups
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        let written = serde_json::to_string(&self.groups)
            .context("encode group state")
            .and_then(|raw| store.write(EXPANDED_STORAGE_KEY, &raw));
        if let Err(error) = written {
            tracing::warn!("group state not saved: {error:#}");
        }
    }
}
