// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use prebill_app::{Comment, FeeEntry, FeeEntryId, FormPayload, InvoiceId, KeyValueStore};
use prebill_store::Store;
use prebill_tui::InvoiceSnapshot;

pub struct StoreRuntime<'a> {
    store: &'a mut Store,
    preferences: &'a mut dyn KeyValueStore,
    author: String,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(
        store: &'a mut Store,
        preferences: &'a mut dyn KeyValueStore,
        author: impl Into<String>,
    ) -> Self {
        Self {
            store,
            preferences,
            author: author.into(),
        }
    }
}

impl prebill_tui::AppRuntime for StoreRuntime<'_> {
    fn load_invoices(&mut self) -> Result<InvoiceSnapshot> {
        Ok(InvoiceSnapshot {
            generation: self.store.generation(),
            invoices: self.store.invoices().to_vec(),
        })
    }

    fn load_fee_entries(&mut self, invoice_id: InvoiceId) -> Result<Vec<FeeEntry>> {
        Ok(self.store.fee_entries(invoice_id).to_vec())
    }

    fn load_comments(&mut self, invoice_id: InvoiceId) -> Result<Vec<Comment>> {
        Ok(self.store.comments(invoice_id).to_vec())
    }

    fn submit_form(&mut self, invoice_id: InvoiceId, payload: &FormPayload) -> Result<()> {
        payload.validate()?;

        match payload {
            FormPayload::EditFeeEntry(entry_id, form) => {
                self.store.update_fee_entry(*entry_id, form)?;
            }
            FormPayload::FeeNote(entry_id, form) => {
                self.store.add_fee_note(*entry_id, form)?;
            }
            FormPayload::Comment(form) => {
                self.store.add_comment(invoice_id, &self.author, form)?;
            }
        }
        Ok(())
    }

    fn delete_fee_entry(&mut self, entry_id: FeeEntryId) -> Result<()> {
        self.store.delete_fee_entry(entry_id)
    }

    fn preferences(&mut self) -> &mut dyn KeyValueStore {
        &mut *self.preferences
    }
}

#[cfg(test)]
mod tests {
    use super::StoreRuntime;
    use anyhow::Result;
    use prebill_app::{
        CommentInput, EXPANDED_STORAGE_KEY, FeeEntryFormInput, FeeNoteInput, FormPayload,
        KeyValueStore,
    };
    use prebill_store::{MemoryStore, Store};
    use prebill_tui::AppRuntime;

    #[test]
    fn snapshot_carries_store_generation() -> Result<()> {
        let mut store = Store::open_demo()?;
        let generation = store.generation();
        let count = store.invoices().len();
        let mut prefs = MemoryStore::new();
        let mut runtime = StoreRuntime::new(&mut store, &mut prefs, "reviewer");

        let snapshot = runtime.load_invoices()?;
        assert_eq!(snapshot.generation, generation);
        assert_eq!(snapshot.invoices.len(), count);
        Ok(())
    }

    #[test]
    fn submit_form_routes_each_payload_to_the_store() -> Result<()> {
        let mut store = Store::open_demo()?;
        let invoice_id = store.invoices()[0].invoice_id;
        let entry = store.fee_entries(invoice_id)[0].clone();
        let mut prefs = MemoryStore::new();
        let mut runtime = StoreRuntime::new(&mut store, &mut prefs, "reviewer");

        let mut edit = FeeEntryFormInput::from_entry(&entry);
        edit.services = "Revised draft".to_owned();
        runtime.submit_form(invoice_id, &FormPayload::EditFeeEntry(entry.id, edit))?;
        runtime.submit_form(
            invoice_id,
            &FormPayload::FeeNote(
                entry.id,
                FeeNoteInput {
                    body: "trim to 1h".to_owned(),
                },
            ),
        )?;
        runtime.submit_form(
            invoice_id,
            &FormPayload::Comment(CommentInput {
                body: "Looks good".to_owned(),
            }),
        )?;

        let entries = runtime.load_fee_entries(invoice_id)?;
        assert_eq!(entries[0].services, "Revised draft");
        assert_eq!(entries[0].notes, vec!["trim to 1h"]);
        let comments = runtime.load_comments(invoice_id)?;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "reviewer");
        Ok(())
    }

    #[test]
    fn invalid_payload_is_rejected_before_the_store() -> Result<()> {
        let mut store = Store::open_demo()?;
        let invoice_id = store.invoices()[0].invoice_id;
        let mut prefs = MemoryStore::new();
        let mut runtime = StoreRuntime::new(&mut store, &mut prefs, "reviewer");

        let error = runtime
            .submit_form(
                invoice_id,
                &FormPayload::Comment(CommentInput {
                    body: "  ".to_owned(),
                }),
            )
            .expect_err("blank comment should fail");
        assert!(error.to_string().contains("comment is empty"));
        assert!(runtime.load_comments(invoice_id)?.is_empty());
        Ok(())
    }

    #[test]
    fn preferences_write_through_to_the_backing_store() -> Result<()> {
        let mut store = Store::open_demo()?;
        let mut prefs = MemoryStore::new();
        {
            let mut runtime = StoreRuntime::new(&mut store, &mut prefs, "reviewer");
            runtime
                .preferences()
                .write(EXPANDED_STORAGE_KEY, r#"{"AH 3":true}"#)?;
        }
        assert_eq!(
            prefs.read(EXPANDED_STORAGE_KEY)?.as_deref(),
            Some(r#"{"AH 3":true}"#)
        );
        Ok(())
    }
}
