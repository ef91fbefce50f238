// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Filter, sort, group and paginate the invoice collection into exactly the
//! page the landing view renders. Every step is pure; [`ResultsCache`]
//! skips recomputation when none of the inputs moved.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;

use time::{Date, OffsetDateTime};

use crate::filters::{FilterState, FilterValues};
use crate::model::{Invoice, SortColumn, SortDirection, SortSpec};

pub const DEFAULT_PER_PAGE: usize = 25;

pub fn filter_invoices<'a>(invoices: &'a [Invoice], filters: &FilterValues) -> Vec<&'a Invoice> {
    let range = match (filters.start_date, filters.end_date) {
        (Some(start), Some(end)) => Some(created_range(start, end)),
        _ => None,
    };
    let keyword = filters.keyword.to_lowercase();

    invoices
        .iter()
        .filter(|invoice| {
            filters.clients.is_empty()
                || filters
                    .clients
                    .iter()
                    .any(|client| client == invoice.client_name())
        })
        .filter(|invoice| {
            filters.statuses.is_empty()
                || filters
                    .statuses
                    .iter()
                    .any(|status| status == invoice.status.as_str())
        })
        .filter(|invoice| match range {
            None => true,
            Some(None) => false,
            Some(Some((start, end))) => invoice
                .created_at()
                .is_some_and(|created| created >= start && created <= end),
        })
        .filter(|invoice| keyword.is_empty() || keyword_haystack(invoice).contains(&keyword))
        .collect()
}

/// Inclusive bounds `[start 00:00:00.000, end 23:59:59.999]` in UTC.
fn created_range(start: Date, end: Date) -> Option<(OffsetDateTime, OffsetDateTime)> {
    let from = start.midnight().assume_utc();
    let to = end.with_hms_milli(23, 59, 59, 999).ok()?.assume_utc();
    Some((from, to))
}

fn keyword_haystack(invoice: &Invoice) -> String {
    format!(
        "{} {} {} {}",
        invoice.matter.name,
        invoice.matter.display_number,
        invoice.bill_num,
        invoice.client_name()
    )
    .to_lowercase()
}

/// Stable sort. `None` keeps the input order.
pub fn sort_invoices(rows: &mut [&Invoice], spec: Option<SortSpec>) {
    let Some(spec) = spec else {
        return;
    };
    rows.sort_by(|left, right| {
        let ordering = compare_by(spec.column, left, right);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(column: SortColumn, left: &Invoice, right: &Invoice) -> Ordering {
    match column {
        SortColumn::Client => left.client_name().cmp(right.client_name()),
        SortColumn::BillNum => left.bill_number().total_cmp(&right.bill_number()),
        SortColumn::CreatedAt => {
            timestamp_key(left.created_at()).cmp(&timestamp_key(right.created_at()))
        }
        SortColumn::BillDate => {
            timestamp_key(left.bill_date()).cmp(&timestamp_key(right.bill_date()))
        }
        SortColumn::Responsible => left
            .responsible_attorney()
            .cmp(right.responsible_attorney()),
        SortColumn::Total => left.total_amount().total_cmp(&right.total_amount()),
        SortColumn::Status => left.status.as_str().cmp(right.status.as_str()),
    }
}

fn timestamp_key(value: Option<OffsetDateTime>) -> i128 {
    value.map_or(0, OffsetDateTime::unix_timestamp_nanos)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientGroup<'a> {
    pub client: String,
    pub invoices: Vec<&'a Invoice>,
}

/// Buckets rows by client name, ascending; rows keep their sorted order.
pub fn group_by_client<'a>(rows: &[&'a Invoice]) -> Vec<ClientGroup<'a>> {
    let mut buckets: BTreeMap<&str, Vec<&'a Invoice>> = BTreeMap::new();
    for invoice in rows {
        buckets.entry(invoice.client_name()).or_default().push(invoice);
    }
    buckets
        .into_iter()
        .map(|(client, invoices)| ClientGroup {
            client: client.to_owned(),
            invoices,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationUnit {
    ByGroup,
    ByRow,
}

impl PaginationUnit {
    pub fn for_filters(filters: &FilterValues) -> Self {
        if filters.grouping_enabled() {
            Self::ByGroup
        } else {
            Self::ByRow
        }
    }

    pub const fn noun(self) -> &'static str {
        match self {
            Self::ByGroup => "clients",
            Self::ByRow => "invoices",
        }
    }
}

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    pub fn first(per_page: usize) -> Self {
        Self::new(1, per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PER_PAGE)
    }
}

/// Slice bounds for `request` over `len` units. Out-of-range pages are empty.
pub fn paginate(len: usize, request: PageRequest) -> Range<usize> {
    let per_page = request.per_page.max(1);
    if request.page == 0 {
        return len..len;
    }
    let start = (request.page - 1).saturating_mul(per_page).min(len);
    let end = start.saturating_add(per_page).min(len);
    start..end
}

pub fn page_count(units: usize, per_page: usize) -> usize {
    units.div_ceil(per_page.max(1))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    pub client: String,
    pub invoices: Vec<Invoice>,
}

impl PageGroup {
    pub fn total_cents(&self) -> i64 {
        self.invoices.iter().map(Invoice::total_cents).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    Flat(Vec<Invoice>),
    Grouped(Vec<PageGroup>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage {
    pub body: PageBody,
    pub unit: PaginationUnit,
    pub page: usize,
    pub total_invoices: usize,
    pub total_units: usize,
    pub page_count: usize,
    pub total_amount_cents: i64,
}

impl ResultPage {
    pub fn is_empty(&self) -> bool {
        self.total_invoices == 0
    }

    /// Units (rows or groups) on this page.
    pub fn shown_units(&self) -> usize {
        match &self.body {
            PageBody::Flat(rows) => rows.len(),
            PageBody::Grouped(groups) => groups.len(),
        }
    }

    /// `Showing 3 of 12 clients`
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} {}",
            self.shown_units(),
            self.total_units,
            self.unit.noun()
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResultQuery<'a> {
    pub filters: &'a FilterValues,
    pub sort: Option<SortSpec>,
    pub page: PageRequest,
}

pub fn derive_results(invoices: &[Invoice], query: ResultQuery<'_>) -> ResultPage {
    let mut rows = filter_invoices(invoices, query.filters);
    sort_invoices(&mut rows, query.sort);
    let total_invoices = rows.len();
    let total_amount_cents = rows.iter().map(|invoice| invoice.total_cents()).sum();
    let unit = PaginationUnit::for_filters(query.filters);

    let (body, total_units) = match unit {
        PaginationUnit::ByRow => {
            let range = paginate(rows.len(), query.page);
            let page = rows[range].iter().map(|invoice| (*invoice).clone()).collect();
            (PageBody::Flat(page), total_invoices)
        }
        PaginationUnit::ByGroup => {
            let groups = group_by_client(&rows);
            let total = groups.len();
            let range = paginate(total, query.page);
            let page = groups[range]
                .iter()
                .map(|group| PageGroup {
                    client: group.client.clone(),
                    invoices: group.invoices.iter().map(|invoice| (*invoice).clone()).collect(),
                })
                .collect();
            (PageBody::Grouped(page), total)
        }
    };

    ResultPage {
        body,
        unit,
        page: query.page.page,
        total_invoices,
        total_units,
        page_count: page_count(total_units, query.page.per_page),
        total_amount_cents,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    generation: u64,
    revision: u64,
    sort: Option<SortSpec>,
    page: PageRequest,
}

/// Memoizes the last derived page. `generation` identifies the invoice
/// collection; the caller bumps it whenever the collection is replaced.
#[derive(Debug, Default)]
pub struct ResultsCache {
    entry: Option<(CacheKey, ResultPage)>,
    computations: u64,
}

impl ResultsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive(
        &mut self,
        invoices: &[Invoice],
        generation: u64,
        filters: &FilterState,
        sort: Option<SortSpec>,
        page: PageRequest,
    ) -> &ResultPage {
        let key = CacheKey {
            generation,
            revision: filters.revision(),
            sort,
            page,
        };
        if self.entry.as_ref().is_some_and(|(cached, _)| *cached != key) {
            self.entry = None;
        }
        let computations = &mut self.computations;
        let (_, result) = self.entry.get_or_insert_with(|| {
            let result = derive_results(
                invoices,
                ResultQuery {
                    filters: filters.applied(),
                    sort,
                    page,
                },
            );
            *computations += 1;
            tracing::trace!(
                generation,
                revision = key.revision,
                rows = result.total_invoices,
                "results recomputed"
            );
            (key, result)
        });
        result
    }

    /// Number of times a page was actually computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
