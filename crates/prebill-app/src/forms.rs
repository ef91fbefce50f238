// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use time::Date;

use crate::{FeeEntry, FeeEntryId, FormKind};

const MAX_HOURS_PER_ENTRY: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FeeEntryFormInput {
    pub date: Date,
    pub services: String,
    pub attorney: String,
    pub activity_code: String,
    pub task_code: String,
    pub event_code: String,
    pub rate_cents: i64,
    pub hours: f64,
    pub no_charge: bool,
}

impl FeeEntryFormInput {
    pub fn from_entry(entry: &FeeEntry) -> Self {
        Self {
            date: entry.date,
            services: entry.services.clone(),
            attorney: entry.attorney.clone(),
            activity_code: entry.activity_code.clone(),
            task_code: entry.task_code.clone(),
            event_code: entry.event_code.clone(),
            rate_cents: entry.rate_cents,
            hours: entry.hours,
            no_charge: entry.no_charge,
        }
    }

    /// Rate times hours, rounded to the cent.
    pub fn amount_cents(&self) -> i64 {
        (self.rate_cents as f64 * self.hours).round() as i64
    }

    pub fn validate(&self) -> Result<()> {
        if self.services.trim().is_empty() {
            bail!("services description is required -- describe the work and retry");
        }
        if self.attorney.trim().is_empty() {
            bail!("attorney is required -- enter the timekeeper and retry");
        }
        if self.rate_cents < 0 {
            bail!("rate per hour cannot be negative");
        }
        if !self.hours.is_finite() || self.hours <= 0.0 {
            bail!("hours must be a positive number");
        }
        if self.hours > MAX_HOURS_PER_ENTRY {
            bail!("hours cannot exceed {MAX_HOURS_PER_ENTRY} for a single entry -- split the entry");
        }
        Ok(())
    }

    /// Writes the edited fields back, recomputing the amount.
    pub fn apply_to(&self, entry: &mut FeeEntry) {
        entry.date = self.date;
        entry.services = self.services.trim().to_owned();
        entry.attorney = self.attorney.trim().to_owned();
        entry.activity_code = self.activity_code.trim().to_owned();
        entry.task_code = self.task_code.trim().to_owned();
        entry.event_code = self.event_code.trim().to_owned();
        entry.rate_cents = self.rate_cents;
        entry.hours = self.hours;
        entry.amount_cents = self.amount_cents();
        entry.no_charge = self.no_charge;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeNoteInput {
    pub body: String,
}

impl FeeNoteInput {
    pub fn validate(&self) -> Result<()> {
        if self.body.trim().is_empty() {
            bail!("note is empty -- type a note and retry");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub body: String,
}

impl CommentInput {
    pub fn validate(&self) -> Result<()> {
        if self.body.trim().is_empty() {
            bail!("comment is empty -- type a comment and retry");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPayload {
    EditFeeEntry(FeeEntryId, FeeEntryFormInput),
    FeeNote(FeeEntryId, FeeNoteInput),
    Comment(CommentInput),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::EditFeeEntry(id, _) => FormKind::EditFeeEntry(*id),
            Self::FeeNote(id, _) => FormKind::FeeNote(*id),
            Self::Comment(_) => FormKind::Comment,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::EditFeeEntry(_, fee) => fee.validate(),
            Self::FeeNote(_, note) => note.validate(),
            Self::Comment(comment) => comment.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentInput, FeeEntryFormInput, FeeNoteInput, FormPayload};
    use crate::{FeeEntry, FeeEntryId, FormKind, InvoiceId};
    use time::macros::date;

    fn entry() -> FeeEntry {
        FeeEntry {
            id: FeeEntryId::new(1),
            invoice_id: InvoiceId::new(14),
            date: date!(2025 - 10 - 01),
            services: "Draft engagement letter".to_owned(),
            attorney: "Kay Summers".to_owned(),
            activity_code: "A103".to_owned(),
            task_code: "L110".to_owned(),
            event_code: String::new(),
            rate_cents: 20_073,
            hours: 7.5,
            amount_cents: 150_548,
            no_charge: false,
            notes: Vec::new(),
        }
    }

    #[test]
    fn fee_form_round_trips_entry_fields() {
        let original = entry();
        let form = FeeEntryFormInput::from_entry(&original);
        assert!(form.validate().is_ok());
        assert_eq!(form.amount_cents(), 150_548);

        let mut updated = original.clone();
        form.apply_to(&mut updated);
        assert_eq!(updated, original);
    }

    #[test]
    fn editing_hours_recomputes_amount() {
        let mut target = entry();
        let mut form = FeeEntryFormInput::from_entry(&target);
        form.hours = 2.0;
        form.services = "  Review filings  ".to_owned();
        form.apply_to(&mut target);
        assert_eq!(target.amount_cents, 40_146);
        assert_eq!(target.services, "Review filings");
    }

    #[test]
    fn fee_validation_rejects_blank_services() {
        let mut form = FeeEntryFormInput::from_entry(&entry());
        form.services = "   ".to_owned();
        let error = form.validate().expect_err("blank services should fail");
        assert!(error.to_string().contains("services description is required"));
    }

    #[test]
    fn fee_validation_rejects_bad_hours() {
        let mut form = FeeEntryFormInput::from_entry(&entry());
        for hours in [0.0, -1.0, f64::NAN, 25.0] {
            form.hours = hours;
            assert!(form.validate().is_err(), "hours {hours} should be rejected");
        }
    }

    #[test]
    fn notes_and_comments_require_text() {
        let note = FormPayload::FeeNote(
            FeeEntryId::new(1),
            FeeNoteInput {
                body: "\n".to_owned(),
            },
        );
        assert!(note.validate().is_err());
        assert_eq!(note.kind(), FormKind::FeeNote(FeeEntryId::new(1)));

        let comment = FormPayload::Comment(CommentInput {
            body: "Looks good".to_owned(),
        });
        assert!(comment.validate().is_ok());
    }
}
