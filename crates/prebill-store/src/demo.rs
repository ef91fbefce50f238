// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use prebill_app::{FeeEntry, FeeEntryId, Invoice};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use time::{Date, Duration};

const DEMO_INVOICES_JSON: &str = include_str!("../data/demo_invoices.json");

struct FeeTemplate {
    services: &'static str,
    attorney: &'static str,
    activity_code: &'static str,
    task_code: &'static str,
    event_code: &'static str,
    rate_cents: i64,
    hours: f64,
}

const FEE_TEMPLATES: [FeeTemplate; 5] = [
    FeeTemplate {
        services: "Nam libero tempore, cum soluta nobis est eligendi optio cumque.",
        attorney: "ATT3",
        activity_code: "A106",
        task_code: "L140",
        event_code: "7988125540",
        rate_cents: 20_073,
        hours: 7.5,
    },
    FeeTemplate {
        services: "Review and revise purchase agreement draft.",
        attorney: "ATT1",
        activity_code: "A104",
        task_code: "L120",
        event_code: "",
        rate_cents: 35_000,
        hours: 2.25,
    },
    FeeTemplate {
        services: "Telephone conference with client regarding closing timeline.",
        attorney: "ATT2",
        activity_code: "A106",
        task_code: "L110",
        event_code: "",
        rate_cents: 27_500,
        hours: 0.5,
    },
    FeeTemplate {
        services: "Prepare disclosure schedules.",
        attorney: "ATT3",
        activity_code: "A103",
        task_code: "L210",
        event_code: "7988125541",
        rate_cents: 20_073,
        hours: 3.0,
    },
    FeeTemplate {
        services: "Correspondence with opposing counsel.",
        attorney: "ATT1",
        activity_code: "A108",
        task_code: "L120",
        event_code: "",
        rate_cents: 35_000,
        hours: 0.75,
    },
];

/// The bundled sample collection.
pub fn demo_invoices() -> Result<Vec<Invoice>> {
    parse_invoices(DEMO_INVOICES_JSON).context("parse bundled demo invoices")
}

/// Reads a JSON array of invoices in the camelCase export shape.
pub fn load_invoices(path: &Path) -> Result<Vec<Invoice>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read invoice data {}", path.display()))?;
    let invoices = parse_invoices(&raw)
        .with_context(|| format!("parse invoice data {}", path.display()))?;
    tracing::info!(path = %path.display(), count = invoices.len(), "invoices loaded");
    Ok(invoices)
}

pub fn parse_invoices(raw: &str) -> Result<Vec<Invoice>> {
    let invoices: Vec<Invoice> =
        serde_json::from_str(raw).context("expected a JSON array of invoices")?;
    let mut seen = BTreeSet::new();
    for invoice in &invoices {
        if !seen.insert(invoice.invoice_id) {
            bail!(
                "invoice id {} appears more than once -- invoice ids must be unique",
                invoice.invoice_id
            );
        }
    }
    Ok(invoices)
}

/// Deterministic billable-time rows for an invoice. The count and dates
/// derive from the invoice id so every run shows the same entries.
pub fn demo_fee_entries(invoice: &Invoice) -> Vec<FeeEntry> {
    let id = invoice.invoice_id.get();
    let count = 1 + id.rem_euclid(FEE_TEMPLATES.len() as i64) as usize;
    let anchor = invoice
        .fee_thru()
        .or_else(|| invoice.created_at())
        .map(|at| at.date())
        .unwrap_or(Date::MIN);

    FEE_TEMPLATES
        .iter()
        .take(count)
        .enumerate()
        .map(|(index, template)| {
            let amount_cents = (template.rate_cents as f64 * template.hours).round() as i64;
            FeeEntry {
                id: FeeEntryId::new(id.saturating_mul(10).saturating_add(index as i64 + 1)),
                invoice_id: invoice.invoice_id,
                date: anchor.saturating_sub(Duration::days(7 * index as i64)),
                services: template.services.to_owned(),
                attorney: template.attorney.to_owned(),
                activity_code: template.activity_code.to_owned(),
                task_code: template.task_code.to_owned(),
                event_code: template.event_code.to_owned(),
                rate_cents: template.rate_cents,
                hours: template.hours,
                amount_cents,
                no_charge: false,
                notes: Vec::new(),
            }
        })
        .collect()
}
