// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

use crate::ids::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    New,
    Posted,
    Paid,
    CollaborationEdits,
    ReviewComplete,
    ReadyForFinalReview,
    ReadyToProcess,
    ErrorOnUpload,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Posted => "Posted",
            Self::Paid => "Paid",
            Self::CollaborationEdits => "Collaboration Edits",
            Self::ReviewComplete => "Review Complete",
            Self::ReadyForFinalReview => "Ready for Final Review",
            Self::ReadyToProcess => "Ready to Process",
            Self::ErrorOnUpload => "Error on Upload",
            Self::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "New" => Self::New,
            "Posted" => Self::Posted,
            "Paid" => Self::Paid,
            "Collaboration Edits" => Self::CollaborationEdits,
            "Review Complete" => Self::ReviewComplete,
            "Ready for Final Review" => Self::ReadyForFinalReview,
            "Ready to Process" => Self::ReadyToProcess,
            "Error on Upload" => Self::ErrorOnUpload,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Badge treatment on the detail header. Unknown statuses fall back to
    /// the default badge.
    pub fn variant(&self) -> StatusVariant {
        match self {
            Self::New | Self::Posted => StatusVariant::Primary,
            Self::Paid => StatusVariant::Secondary,
            Self::CollaborationEdits | Self::ReviewComplete => StatusVariant::Warning,
            _ => StatusVariant::Default,
        }
    }
}

impl From<String> for InvoiceStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<InvoiceStatus> for String {
    fn from(value: InvoiceStatus) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusVariant {
    Primary,
    Secondary,
    Warning,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub clt_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attorney {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatterMetadata {
    #[serde(default)]
    pub billing_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matter {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub display_number: String,
    pub bill_attorney: Attorney,
    #[serde(default)]
    pub metadata: MatterMetadata,
    pub client: Client,
}

/// A prebill as supplied by the data source. Dates and amounts are kept as
/// the source strings; the accessors below parse them leniently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: InvoiceId,
    pub bill_code: String,
    pub bill_num: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub status_description: Option<String>,
    pub created_at: String,
    pub bill_date: String,
    #[serde(default)]
    pub fee_thru: String,
    pub total: String,
    #[serde(default)]
    pub balance: String,
    #[serde(default)]
    pub hold_type: Option<String>,
    #[serde(default)]
    pub hold_reason: Option<String>,
    pub matter: Matter,
}

impl Invoice {
    pub fn client_name(&self) -> &str {
        &self.matter.client.name
    }

    pub fn responsible_attorney(&self) -> &str {
        &self.matter.bill_attorney.name
    }

    pub fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }

    pub fn bill_date(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.bill_date)
    }

    pub fn fee_thru(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.fee_thru)
    }

    pub fn total_cents(&self) -> i64 {
        parse_amount_cents(&self.total).unwrap_or(0)
    }

    pub fn balance_cents(&self) -> i64 {
        parse_amount_cents(&self.balance).unwrap_or(0)
    }

    /// Unrounded total; the sort key. Display and sums use `total_cents`.
    pub fn total_amount(&self) -> f64 {
        parse_number(&self.total).unwrap_or(0.0)
    }

    pub fn bill_number(&self) -> f64 {
        parse_number(&self.bill_num).unwrap_or(0.0)
    }

    /// `02312 - Matter name`, the label used for invoice rows.
    pub fn matter_label(&self) -> String {
        format!("{} - {}", self.matter.display_number, self.matter.name)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    OffsetDateTime::parse(trimmed, &Rfc3339).ok()
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_amount_cents(raw: &str) -> Option<i64> {
    let value = parse_number(raw)?;
    let cents = (value * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortColumn {
    Client,
    BillNum,
    CreatedAt,
    BillDate,
    Responsible,
    Total,
    Status,
}

impl SortColumn {
    pub const ALL: [Self; 7] = [
        Self::Client,
        Self::BillNum,
        Self::CreatedAt,
        Self::BillDate,
        Self::Responsible,
        Self::Total,
        Self::Status,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::BillNum => "billNum",
            Self::CreatedAt => "createdAt",
            Self::BillDate => "billDate",
            Self::Responsible => "responsible",
            Self::Total => "total",
            Self::Status => "status",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "client" => Some(Self::Client),
            "billNum" => Some(Self::BillNum),
            "createdAt" => Some(Self::CreatedAt),
            "billDate" => Some(Self::BillDate),
            "responsible" => Some(Self::Responsible),
            "total" => Some(Self::Total),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "Matter",
            Self::BillNum => "Bill Num",
            Self::CreatedAt => "Date Generated",
            Self::BillDate => "Bill Date",
            Self::Responsible => "Responsible Attorney",
            Self::Total => "Total",
            Self::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub const fn asc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }

    /// Same column flips direction; a different column starts ascending.
    pub fn request(current: Option<Self>, column: SortColumn) -> Self {
        match current {
            Some(spec) if spec.column == column => Self {
                column,
                direction: spec.direction.flipped(),
            },
            _ => Self::asc(column),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailTab {
    Fees,
    Expenses,
    Notes,
    Summary,
    Attachments,
    MatterMaintenance,
    ClientMaintenance,
    General,
}

impl DetailTab {
    pub const ALL: [Self; 8] = [
        Self::Fees,
        Self::Expenses,
        Self::Notes,
        Self::Summary,
        Self::Attachments,
        Self::MatterMaintenance,
        Self::ClientMaintenance,
        Self::General,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fees => "Fees",
            Self::Expenses => "Expenses",
            Self::Notes => "Notes",
            Self::Summary => "Summary",
            Self::Attachments => "Attachments",
            Self::MatterMaintenance => "Matter Maintenance",
            Self::ClientMaintenance => "Client Maintenance",
            Self::General => "General",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    Landing,
    Detail(InvoiceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    EditFeeEntry(FeeEntryId),
    FeeNote(FeeEntryId),
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Filters,
    Form(FormKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEntry {
    pub id: FeeEntryId,
    pub invoice_id: InvoiceId,
    pub date: Date,
    pub services: String,
    pub attorney: String,
    pub activity_code: String,
    pub task_code: String,
    pub event_code: String,
    pub rate_cents: i64,
    pub hours: f64,
    pub amount_cents: i64,
    pub no_charge: bool,
    pub notes: Vec<String>,
}

impl FeeEntry {
    /// Search-box match over the free-text columns of a fee row.
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.services.as_str(),
            self.attorney.as_str(),
            self.activity_code.as_str(),
            self.task_code.as_str(),
            self.event_code.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub invoice_id: InvoiceId,
    pub author: String,
    pub body: String,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::{
        InvoiceStatus, SortColumn, SortDirection, SortSpec, StatusVariant, parse_amount_cents,
        parse_timestamp,
    };

    #[test]
    fn status_round_trips_known_and_unknown_labels() {
        assert_eq!(
            InvoiceStatus::parse("Collaboration Edits"),
            InvoiceStatus::CollaborationEdits
        );
        let other = InvoiceStatus::parse("Awaiting Partner");
        assert_eq!(other.as_str(), "Awaiting Partner");
        assert_eq!(other.variant(), StatusVariant::Default);
        assert_eq!(InvoiceStatus::Paid.variant(), StatusVariant::Secondary);
    }

    #[test]
    fn amounts_degrade_to_none_when_malformed() {
        assert_eq!(parse_amount_cents("3528.69"), Some(352_869));
        assert_eq!(parse_amount_cents(" 5 "), Some(500));
        assert_eq!(parse_amount_cents("n/a"), None);
        assert_eq!(parse_amount_cents(""), None);
    }

    #[test]
    fn timestamps_parse_rfc3339_with_millis() {
        let parsed = parse_timestamp("2026-01-26T10:14:05.000Z").expect("valid timestamp");
        assert_eq!(parsed.unix_timestamp(), 1_769_422_445);
        assert!(parse_timestamp("Mon Jan 26 2026").is_none());
    }

    #[test]
    fn sort_request_flips_same_column_and_resets_new_column() {
        let first = SortSpec::request(None, SortColumn::Total);
        assert_eq!(first, SortSpec::asc(SortColumn::Total));

        let flipped = SortSpec::request(Some(first), SortColumn::Total);
        assert_eq!(flipped.direction, SortDirection::Desc);

        let other = SortSpec::request(Some(flipped), SortColumn::Client);
        assert_eq!(other, SortSpec::asc(SortColumn::Client));
    }

    #[test]
    fn sort_column_keys_round_trip() {
        for column in SortColumn::ALL {
            assert_eq!(SortColumn::parse(column.as_str()), Some(column));
        }
        assert_eq!(SortColumn::parse("hold"), None);
    }
}
