// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use prebill_app::{
    Attorney, Client, FeeEntry, FeeEntryId, Invoice, InvoiceId, InvoiceStatus, Matter,
    MatterMetadata,
};
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};

const CLIENT_NAMES: [&str; 8] = [
    "Anh Hoang1",
    "Juniper Ridge Partners",
    "Peter Gibbons",
    "Assurance America",
    "AH 3",
    "Halvorsen Freight",
    "Marisol Vega",
    "Northgate Dental Group",
];

const STATUSES: [&str; 6] = [
    "Posted",
    "Paid",
    "Collaboration Edits",
    "Review Complete",
    "New",
    "Ready for Final Review",
];

const ATTORNEYS: [&str; 8] = [
    "Kay Summers",
    "Lee Park",
    "Dana Whitfield",
    "Omar Haddad",
    "Priya Raman",
    "Tom Castillo",
    "Beth Oduya",
    "Ian Moretti",
];

const MATTER_SUBJECTS: [&str; 10] = [
    "Lease Renewal",
    "Estate Planning",
    "Contract Dispute",
    "Trademark Filing",
    "Employment Review",
    "Acquisition Diligence",
    "Zoning Appeal",
    "Insurance Claim",
    "Vendor Agreement",
    "Litigation Hold",
];

const BILLING_METHODS: [&str; 3] = ["Hourly", "Flat Fee", "Contingency"];

const SERVICES: [&str; 10] = [
    "Draft engagement letter",
    "Review opposing counsel correspondence",
    "Telephone conference with client",
    "Prepare discovery responses",
    "Research case law on liability",
    "Revise settlement agreement",
    "Attend hearing",
    "Prepare closing documents",
    "Analyze lease provisions",
    "Summarize deposition transcript",
];

const ACTIVITY_CODES: [&str; 5] = ["A101", "A102", "A103", "A104", "A106"];
const TASK_CODES: [&str; 5] = ["L110", "L120", "L210", "L310", "L430"];

const REFERENCE_DATE: Date = time::macros::date!(2026 - 01 - 01);

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of plausible invoices and fee entries.
#[derive(Debug, Clone)]
pub struct InvoiceFaker {
    rng: DeterministicRng,
}

impl InvoiceFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn invoice(&mut self, id: i64) -> Invoice {
        let client = self.pick(&CLIENT_NAMES);
        let status = self.pick(&STATUSES);
        let attorney = self.pick(&ATTORNEYS);
        let subject = self.pick(&MATTER_SUBJECTS);
        let billing_method = self.pick(&BILLING_METHODS);
        let created = self.datetime_in_days(0, 120);
        let bill_date = created + Duration::days(self.int_range(0, 14));
        let total_cents = self.int_range(0, 2_500_000);
        let balance_cents = if status == "Paid" {
            0
        } else {
            total_cents
        };
        let hold_type = if self.rng.int_n(5) == 0 {
            Some("Credit Hold".to_owned())
        } else {
            None
        };

        InvoiceBuilder::new(id, client)
            .status(status)
            .created_at(&rfc3339(created))
            .bill_date(&rfc3339(bill_date))
            .total(&format_decimal(total_cents))
            .balance(&format_decimal(balance_cents))
            .matter(&format!("{subject} - {client}"), &format!("{:05}", 2_000 + id))
            .attorney(attorney)
            .billing_method(billing_method)
            .hold_type(hold_type)
            .build()
    }

    pub fn invoices(&mut self, count: usize) -> Vec<Invoice> {
        (1..=count as i64).map(|id| self.invoice(id)).collect()
    }

    pub fn fee_entry(&mut self, id: i64, invoice_id: InvoiceId) -> FeeEntry {
        let rate_cents = self.int_range(15_000, 65_000);
        let hours = self.int_range(1, 40) as f64 / 4.0;
        let no_charge = self.rng.int_n(10) == 0;
        let date = REFERENCE_DATE - Duration::days(self.int_range(0, 90));
        FeeEntry {
            id: FeeEntryId::new(id),
            invoice_id,
            date,
            services: self.pick(&SERVICES).to_owned(),
            attorney: self.pick(&ATTORNEYS).to_owned(),
            activity_code: self.pick(&ACTIVITY_CODES).to_owned(),
            task_code: self.pick(&TASK_CODES).to_owned(),
            event_code: if self.rng.bool() {
                String::new()
            } else {
                format!("E{:03}", self.int_range(100, 120))
            },
            rate_cents,
            hours,
            amount_cents: (rate_cents as f64 * hours).round() as i64,
            no_charge,
            notes: Vec::new(),
        }
    }

    pub fn fee_entries(&mut self, invoice_id: InvoiceId, count: usize) -> Vec<FeeEntry> {
        (1..=count as i64)
            .map(|id| self.fee_entry(invoice_id.get() * 1_000 + id, invoice_id))
            .collect()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn datetime_in_days(&mut self, min_days: i64, max_days: i64) -> OffsetDateTime {
        let base = REFERENCE_DATE.midnight().assume_utc();
        let seconds = self.int_range(min_days * 86_400, max_days * 86_400);
        base + Duration::seconds(seconds)
    }
}

/// Builds one invoice with only the fields a test cares about.
#[derive(Debug, Clone)]
pub struct InvoiceBuilder {
    invoice: Invoice,
}

impl InvoiceBuilder {
    pub fn new(id: i64, client: &str) -> Self {
        Self {
            invoice: Invoice {
                invoice_id: InvoiceId::new(id),
                bill_code: format!("PB-{id:04}"),
                bill_num: id.to_string(),
                status: InvoiceStatus::Posted,
                status_description: None,
                created_at: fixture_datetime().to_owned(),
                bill_date: fixture_datetime().to_owned(),
                fee_thru: fixture_datetime().to_owned(),
                total: "0.00".to_owned(),
                balance: "0.00".to_owned(),
                hold_type: None,
                hold_reason: None,
                matter: Matter {
                    name: format!("Matter {id}"),
                    short_name: None,
                    display_number: format!("{:05}", id),
                    bill_attorney: Attorney {
                        name: ATTORNEYS[0].to_owned(),
                    },
                    metadata: MatterMetadata::default(),
                    client: Client {
                        name: client.to_owned(),
                        clt_code: format!("C{id:03}"),
                    },
                },
            },
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.invoice.status = InvoiceStatus::parse(status);
        self
    }

    pub fn created_at(mut self, value: &str) -> Self {
        self.invoice.created_at = value.to_owned();
        self
    }

    pub fn bill_date(mut self, value: &str) -> Self {
        self.invoice.bill_date = value.to_owned();
        self
    }

    pub fn bill_num(mut self, value: &str) -> Self {
        self.invoice.bill_num = value.to_owned();
        self
    }

    pub fn total(mut self, value: &str) -> Self {
        self.invoice.total = value.to_owned();
        self
    }

    pub fn balance(mut self, value: &str) -> Self {
        self.invoice.balance = value.to_owned();
        self
    }

    pub fn matter(mut self, name: &str, display_number: &str) -> Self {
        self.invoice.matter.name = name.to_owned();
        self.invoice.matter.display_number = display_number.to_owned();
        self
    }

    pub fn attorney(mut self, name: &str) -> Self {
        self.invoice.matter.bill_attorney.name = name.to_owned();
        self
    }

    pub fn billing_method(mut self, method: &str) -> Self {
        self.invoice.matter.metadata.billing_method = method.to_owned();
        self
    }

    pub fn hold_type(mut self, hold_type: Option<String>) -> Self {
        self.invoice.hold_type = hold_type;
        self
    }

    pub fn build(self) -> Invoice {
        self.invoice
    }
}

pub fn temp_state_dir() -> Result<tempfile::TempDir> {
    tempfile::tempdir().context("create temp state dir")
}

pub fn temp_file_path(name: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = temp_state_dir()?;
    let path = dir.path().join(name);
    Ok((dir, path))
}

pub fn fixture_datetime() -> &'static str {
    "2026-01-26T10:14:05.000Z"
}

pub fn client_names() -> &'static [&'static str] {
    &CLIENT_NAMES
}

pub fn statuses() -> &'static [&'static str] {
    &STATUSES
}

fn rfc3339(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| fixture_datetime().to_owned())
}

fn format_decimal(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
