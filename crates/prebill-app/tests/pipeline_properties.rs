// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use prebill_app::{
    FilterValues, Invoice, PageBody, PageRequest, ResultQuery, SortColumn, SortDirection,
    SortSpec, derive_results, filter_invoices, group_by_client, sort_invoices,
};
use prebill_testkit::{InvoiceBuilder, InvoiceFaker, client_names, statuses};
use proptest::prelude::*;
use std::collections::BTreeSet;
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration};

fn arb_invoices() -> impl Strategy<Value = Vec<Invoice>> {
    (any::<u64>(), 0_usize..40).prop_map(|(seed, count)| InvoiceFaker::new(seed).invoices(count))
}

fn arb_column() -> impl Strategy<Value = SortColumn> {
    prop::sample::select(SortColumn::ALL.to_vec())
}

/// Columns whose keys are effectively unique in generated data.
fn arb_distinct_column() -> impl Strategy<Value = SortColumn> {
    prop::sample::select(vec![
        SortColumn::BillNum,
        SortColumn::CreatedAt,
        SortColumn::BillDate,
        SortColumn::Total,
    ])
}

fn arb_filters() -> impl Strategy<Value = FilterValues> {
    (
        prop::sample::subsequence(client_names().to_vec(), 0..3),
        prop::sample::subsequence(statuses().to_vec(), 0..3),
        prop::option::of("[a-z0-9 ]{0,4}"),
    )
        .prop_map(|(clients, states, keyword)| FilterValues {
            clients: clients.into_iter().map(str::to_owned).collect(),
            statuses: states.into_iter().map(str::to_owned).collect(),
            keyword: keyword.unwrap_or_default(),
            ..FilterValues::default()
        })
}

fn ids(rows: &[&Invoice]) -> Vec<i64> {
    rows.iter().map(|invoice| invoice.invoice_id.get()).collect()
}

fn shuffled(mut invoices: Vec<Invoice>, seed: u64) -> Vec<Invoice> {
    let mut faker = InvoiceFaker::new(seed);
    for index in (1..invoices.len()).rev() {
        let other = faker.int_n(index + 1);
        invoices.swap(index, other);
    }
    invoices
}

fn sort_key(invoice: &Invoice, column: SortColumn) -> String {
    match column {
        SortColumn::Client => invoice.client_name().to_owned(),
        SortColumn::BillNum => format!("{:020}", invoice.bill_number() as i64),
        SortColumn::CreatedAt => format!("{:?}", invoice.created_at()),
        SortColumn::BillDate => format!("{:?}", invoice.bill_date()),
        SortColumn::Responsible => invoice.responsible_attorney().to_owned(),
        SortColumn::Total => format!("{:?}", invoice.total_amount()),
        SortColumn::Status => invoice.status.as_str().to_owned(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn filtering_yields_a_subset(invoices in arb_invoices(), filters in arb_filters()) {
        let rows = filter_invoices(&invoices, &filters);
        prop_assert!(rows.len() <= invoices.len());
        for row in &rows {
            prop_assert!(invoices.iter().any(|invoice| std::ptr::eq(invoice, *row)));
        }
    }

    #[test]
    fn inactive_keys_do_not_change_results(invoices in arb_invoices(), filters in arb_filters()) {
        let baseline = ids(&filter_invoices(&invoices, &filters));

        let mut padded = filters.clone();
        padded.billers = Vec::new();
        padded.hold_types = Vec::new();
        padded.start_date = None;
        prop_assert_eq!(ids(&filter_invoices(&invoices, &padded)), baseline.clone());

        let mut half_range = filters;
        half_range.start_date = Some(time::macros::date!(2026 - 02 - 01));
        prop_assert_eq!(ids(&filter_invoices(&invoices, &half_range)), baseline);
    }

    #[test]
    fn sorting_is_idempotent(
        invoices in arb_invoices(),
        column in arb_column(),
        descending in any::<bool>(),
    ) {
        let spec = if descending { SortSpec::desc(column) } else { SortSpec::asc(column) };
        let mut once: Vec<&Invoice> = invoices.iter().collect();
        sort_invoices(&mut once, Some(spec));
        let mut twice = once.clone();
        sort_invoices(&mut twice, Some(spec));
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn flipping_direction_reverses_distinct_keys(
        invoices in arb_invoices(),
        column in arb_distinct_column(),
        shuffle_seed in any::<u64>(),
    ) {
        let invoices = shuffled(invoices, shuffle_seed);
        let keys: BTreeSet<String> = invoices.iter().map(|invoice| sort_key(invoice, column)).collect();
        prop_assume!(keys.len() == invoices.len());

        let asc_spec = SortSpec::request(None, column);
        prop_assert_eq!(asc_spec.direction, SortDirection::Asc);
        let desc_spec = SortSpec::request(Some(asc_spec), column);

        let mut ascending: Vec<&Invoice> = invoices.iter().collect();
        sort_invoices(&mut ascending, Some(asc_spec));
        let mut descending: Vec<&Invoice> = invoices.iter().collect();
        sort_invoices(&mut descending, Some(desc_spec));

        let mut reversed = ids(&ascending);
        reversed.reverse();
        prop_assert_eq!(ids(&descending), reversed);
    }

    #[test]
    fn flat_pages_cover_every_row_once(
        invoices in arb_invoices(),
        per_page in 1_usize..12,
        column in arb_column(),
    ) {
        let filters = FilterValues { group_by_client: Some(false), ..FilterValues::default() };
        let sort = Some(SortSpec::asc(column));
        let mut expected: Vec<&Invoice> = invoices.iter().collect();
        sort_invoices(&mut expected, sort);

        let first = derive_results(&invoices, ResultQuery { filters: &filters, sort, page: PageRequest::new(1, per_page) });
        let mut seen = Vec::new();
        for page in 1..=first.page_count {
            let result = derive_results(&invoices, ResultQuery { filters: &filters, sort, page: PageRequest::new(page, per_page) });
            let PageBody::Flat(rows) = result.body else {
                return Err(TestCaseError::fail("flat mode returned groups"));
            };
            prop_assert!(!rows.is_empty());
            seen.extend(rows.iter().map(|invoice| invoice.invoice_id.get()));
        }
        prop_assert_eq!(seen, ids(&expected));

        let past_end = derive_results(&invoices, ResultQuery { filters: &filters, sort, page: PageRequest::new(first.page_count + 1, per_page) });
        prop_assert_eq!(past_end.shown_units(), 0);
    }

    #[test]
    fn grouped_pages_cover_every_client_once(invoices in arb_invoices(), per_page in 1_usize..4) {
        let filters = FilterValues::default();
        let rows: Vec<&Invoice> = invoices.iter().collect();
        let expected: Vec<String> = group_by_client(&rows).into_iter().map(|group| group.client).collect();

        let first = derive_results(&invoices, ResultQuery { filters: &filters, sort: None, page: PageRequest::new(1, per_page) });
        prop_assert_eq!(first.total_units, expected.len());
        let mut seen = Vec::new();
        let mut invoice_count = 0;
        for page in 1..=first.page_count {
            let result = derive_results(&invoices, ResultQuery { filters: &filters, sort: None, page: PageRequest::new(page, per_page) });
            let PageBody::Grouped(groups) = result.body else {
                return Err(TestCaseError::fail("grouped mode returned rows"));
            };
            for group in groups {
                invoice_count += group.invoices.len();
                seen.push(group.client);
            }
        }
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(invoice_count, invoices.len());
    }

    #[test]
    fn date_bounds_are_inclusive(offset_days in 0_i64..300, span_days in 0_i64..30) {
        let start: Date = time::macros::date!(2025 - 06 - 01) + Duration::days(offset_days);
        let end = start + Duration::days(span_days);
        let start_at = start.midnight().assume_utc();
        let end_at = start_at + Duration::days(span_days + 1) - Duration::milliseconds(1);
        let micro = Duration::microseconds(1);

        let stamp = |at: time::OffsetDateTime| at.format(&Rfc3339).unwrap_or_default();
        let invoices = vec![
            InvoiceBuilder::new(1, "Acme").created_at(&stamp(start_at)).build(),
            InvoiceBuilder::new(2, "Acme").created_at(&stamp(end_at)).build(),
            InvoiceBuilder::new(3, "Acme").created_at(&stamp(start_at - micro)).build(),
            InvoiceBuilder::new(4, "Acme").created_at(&stamp(end_at + micro)).build(),
        ];
        let filters = FilterValues {
            start_date: Some(start),
            end_date: Some(end),
            ..FilterValues::default()
        };
        prop_assert_eq!(ids(&filter_invoices(&invoices, &filters)), vec![1, 2]);
    }
}
