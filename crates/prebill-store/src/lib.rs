// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod demo;
mod kv;

pub use demo::{demo_fee_entries, demo_invoices, load_invoices, parse_invoices};
pub use kv::{FileStore, MemoryStore, validate_key};

use anyhow::{Context, Result, anyhow};
use prebill_app::{
    Comment, CommentId, CommentInput, FeeEntry, FeeEntryFormInput, FeeEntryId, FeeNoteInput,
    Invoice, InvoiceId,
};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use time::OffsetDateTime;

pub const APP_NAME: &str = "prebill";
pub const STATE_DIR_ENV: &str = "PREBILL_STATE_DIR";

/// Where local UI state is kept. Created on demand.
pub fn default_state_dir() -> Result<PathBuf> {
    if let Some(override_dir) = env::var_os(STATE_DIR_ENV) {
        return Ok(PathBuf::from(override_dir));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {STATE_DIR_ENV} to a writable directory")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir)
}

/// In-memory invoice session: the loaded collection plus the fee entries
/// and comments edited during this run.
#[derive(Debug, Clone, Default)]
pub struct Store {
    invoices: Vec<Invoice>,
    generation: u64,
    fee_entries: BTreeMap<InvoiceId, Vec<FeeEntry>>,
    comments: BTreeMap<InvoiceId, Vec<Comment>>,
    next_comment_id: i64,
}

impl Store {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        let mut store = Self::default();
        store.replace_invoices(invoices);
        store
    }

    pub fn open_demo() -> Result<Self> {
        Ok(Self::new(demo_invoices()?))
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Changes whenever the collection is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn replace_invoices(&mut self, invoices: Vec<Invoice>) {
        self.fee_entries = invoices
            .iter()
            .map(|invoice| (invoice.invoice_id, demo_fee_entries(invoice)))
            .collect();
        self.comments.clear();
        self.invoices = invoices;
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(
            count = self.invoices.len(),
            generation = self.generation,
            "invoice collection replaced"
        );
    }

    pub fn invoice(&self, invoice_id: InvoiceId) -> Option<&Invoice> {
        self.invoices
            .iter()
            .find(|invoice| invoice.invoice_id == invoice_id)
    }

    pub fn fee_entries(&self, invoice_id: InvoiceId) -> &[FeeEntry] {
        self.fee_entries
            .get(&invoice_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn update_fee_entry(&mut self, entry_id: FeeEntryId, input: &FeeEntryFormInput) -> Result<()> {
        input.validate()?;
        let entry = self.fee_entry_mut(entry_id)?;
        input.apply_to(entry);
        tracing::info!(entry = %entry_id, "fee entry updated");
        Ok(())
    }

    pub fn add_fee_note(&mut self, entry_id: FeeEntryId, input: &FeeNoteInput) -> Result<()> {
        input.validate()?;
        let entry = self.fee_entry_mut(entry_id)?;
        entry.notes.push(input.body.trim().to_owned());
        tracing::info!(entry = %entry_id, "fee note added");
        Ok(())
    }

    pub fn delete_fee_entry(&mut self, entry_id: FeeEntryId) -> Result<()> {
        for entries in self.fee_entries.values_mut() {
            if let Some(index) = entries.iter().position(|entry| entry.id == entry_id) {
                entries.remove(index);
                tracing::info!(entry = %entry_id, "fee entry deleted");
                return Ok(());
            }
        }
        Err(anyhow!("fee entry {entry_id} not found"))
    }

    pub fn add_comment(
        &mut self,
        invoice_id: InvoiceId,
        author: &str,
        input: &CommentInput,
    ) -> Result<CommentId> {
        input.validate()?;
        if self.invoice(invoice_id).is_none() {
            return Err(anyhow!("invoice {invoice_id} not found"));
        }
        self.next_comment_id += 1;
        let id = CommentId::new(self.next_comment_id);
        self.comments.entry(invoice_id).or_default().push(Comment {
            id,
            invoice_id,
            author: author.to_owned(),
            body: input.body.trim().to_owned(),
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    pub fn comments(&self, invoice_id: InvoiceId) -> &[Comment] {
        self.comments
            .get(&invoice_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn fee_entry_mut(&mut self, entry_id: FeeEntryId) -> Result<&mut FeeEntry> {
        self.fee_entries
            .values_mut()
            .flat_map(|entries| entries.iter_mut())
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| anyhow!("fee entry {entry_id} not found"))
    }
}
