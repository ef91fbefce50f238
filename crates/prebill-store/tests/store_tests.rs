// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use prebill_app::{
    CommentInput, EXPANDED_STORAGE_KEY, ExpandedGroups, FeeEntryFormInput, FeeNoteInput,
    InvoiceId, KeyValueStore,
};
use prebill_store::{FileStore, MemoryStore, Store, demo_invoices, load_invoices, validate_key};
use prebill_testkit::{InvoiceFaker, temp_file_path, temp_state_dir};
use std::fs;

#[test]
fn file_store_round_trips_and_overwrites() -> Result<()> {
    let dir = temp_state_dir()?;
    let mut store = FileStore::open(dir.path().join("nested"))?;
    assert_eq!(store.read("prebill_expanded")?, None);

    store.write("prebill_expanded", r#"{"Acme":true}"#)?;
    store.write("prebill_expanded", r#"{"Acme":false}"#)?;
    assert_eq!(
        store.read("prebill_expanded")?.as_deref(),
        Some(r#"{"Acme":false}"#)
    );

    let leftovers: Vec<_> = fs::read_dir(store.dir())?
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(leftovers, vec!["prebill_expanded.json".to_owned()]);
    Ok(())
}

#[test]
fn file_store_rejects_path_like_keys() -> Result<()> {
    let dir = temp_state_dir()?;
    let mut store = FileStore::open(dir.path())?;
    let error = store
        .write("../escape", "{}")
        .expect_err("path traversal key should fail");
    assert!(error.to_string().contains("contains '.'"));
    assert!(validate_key("").is_err());
    assert!(validate_key("prebill_expanded").is_ok());
    Ok(())
}

#[test]
fn expanded_groups_survive_a_restart() -> Result<()> {
    let dir = temp_state_dir()?;
    {
        let mut store = FileStore::open(dir.path())?;
        let mut groups = ExpandedGroups::load(&store);
        groups.toggle("Peter Gibbons", &mut store);
    }
    let store = FileStore::open(dir.path())?;
    let groups = ExpandedGroups::load(&store);
    assert!(groups.is_expanded("Peter Gibbons"));
    assert!(!groups.is_expanded("AH 3"));
    Ok(())
}

#[test]
fn corrupt_state_file_loads_collapsed() -> Result<()> {
    let dir = temp_state_dir()?;
    let store = FileStore::open(dir.path())?;
    fs::write(store.path_for(EXPANDED_STORAGE_KEY)?, "[1, 2, 3]")?;
    assert!(ExpandedGroups::try_load(&store).is_err());
    assert!(ExpandedGroups::load(&store).entries().is_empty());
    Ok(())
}

#[test]
fn memory_store_keeps_values() -> Result<()> {
    let mut store = MemoryStore::new();
    store.write("k", "v")?;
    assert_eq!(store.get("k"), Some("v"));
    assert_eq!(store.read("missing")?, None);
    Ok(())
}

#[test]
fn load_invoices_reports_path_on_error() -> Result<()> {
    let (_dir, path) = temp_file_path("invoices.json")?;
    fs::write(&path, "{\"not\": \"an array\"}")?;
    let error = load_invoices(&path).expect_err("object should not parse as invoices");
    let message = format!("{error:#}");
    assert!(message.contains("invoices.json"), "{message}");
    assert!(message.contains("expected a JSON array of invoices"), "{message}");

    let missing = load_invoices(&path.with_file_name("absent.json"))
        .expect_err("missing file should fail");
    assert!(missing.to_string().contains("read invoice data"));
    Ok(())
}

#[test]
fn load_invoices_reads_exported_shape() -> Result<()> {
    let (_dir, path) = temp_file_path("invoices.json")?;
    let invoices = InvoiceFaker::new(11).invoices(5);
    fs::write(&path, serde_json::to_string(&invoices)?)?;
    assert_eq!(load_invoices(&path)?, invoices);
    Ok(())
}

#[test]
fn demo_collection_matches_sample_clients() -> Result<()> {
    let invoices = demo_invoices()?;
    let mut clients: Vec<&str> = invoices.iter().map(|invoice| invoice.client_name()).collect();
    clients.sort_unstable();
    clients.dedup();
    assert_eq!(
        clients,
        vec![
            "AH 3",
            "Anh Hoang1",
            "Assurance America",
            "Juniper Ridge Partners",
            "Peter Gibbons",
        ]
    );
    Ok(())
}

#[test]
fn fee_entry_edits_are_validated_and_applied() -> Result<()> {
    let mut store = Store::open_demo()?;
    let invoice_id = store.invoices()[0].invoice_id;
    let entry = store.fee_entries(invoice_id)[0].clone();

    let mut form = FeeEntryFormInput::from_entry(&entry);
    form.hours = 1.0;
    store.update_fee_entry(entry.id, &form)?;
    assert_eq!(store.fee_entries(invoice_id)[0].amount_cents, entry.rate_cents);

    form.services = String::new();
    let error = store
        .update_fee_entry(entry.id, &form)
        .expect_err("blank services should fail");
    assert!(error.to_string().contains("services description is required"));
    assert_eq!(store.fee_entries(invoice_id)[0].hours, 1.0);
    Ok(())
}

#[test]
fn notes_comments_and_deletes() -> Result<()> {
    let mut store = Store::open_demo()?;
    let invoice_id = store.invoices()[0].invoice_id;
    let entry_id = store.fee_entries(invoice_id)[0].id;

    store.add_fee_note(
        entry_id,
        &FeeNoteInput {
            body: "  write down half  ".to_owned(),
        },
    )?;
    assert_eq!(store.fee_entries(invoice_id)[0].notes, vec!["write down half"]);

    let comment_id = store.add_comment(
        invoice_id,
        "reviewer",
        &CommentInput {
            body: "Ready for partner".to_owned(),
        },
    )?;
    assert_eq!(store.comments(invoice_id)[0].id, comment_id);
    assert!(
        store
            .add_comment(
                InvoiceId::new(-1),
                "reviewer",
                &CommentInput {
                    body: "lost".to_owned()
                }
            )
            .is_err()
    );

    let before = store.fee_entries(invoice_id).len();
    store.delete_fee_entry(entry_id)?;
    assert_eq!(store.fee_entries(invoice_id).len(), before - 1);
    assert!(store.delete_fee_entry(entry_id).is_err());
    Ok(())
}

#[test]
fn replacing_invoices_bumps_generation() {
    let mut store = Store::new(InvoiceFaker::new(1).invoices(3));
    let first = store.generation();
    store.replace_invoices(InvoiceFaker::new(2).invoices(4));
    assert_ne!(store.generation(), first);
    assert_eq!(store.invoices().len(), 4);
    assert!(store.invoice(InvoiceId::new(4)).is_some());
}
