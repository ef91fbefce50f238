// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use prebill_app::{
    FilterKey, FilterState, FilterValues, Invoice, PageBody, PageRequest, ResultQuery,
    ResultsCache, SortColumn, SortSpec, derive_results, filter_invoices, sort_invoices,
};
use prebill_testkit::InvoiceBuilder;

fn ids(rows: &[&Invoice]) -> Vec<i64> {
    rows.iter().map(|invoice| invoice.invoice_id.get()).collect()
}

#[test]
fn status_filter_keeps_original_order_without_sort() {
    let invoices = vec![
        InvoiceBuilder::new(1, "Acme").status("Posted").build(),
        InvoiceBuilder::new(2, "Acme").status("Paid").build(),
        InvoiceBuilder::new(3, "Zeta").status("Posted").build(),
    ];
    let mut state = FilterState::default();
    state.update_draft(|draft| draft.statuses = vec!["Posted".to_owned()]);
    state.apply();

    let mut rows = filter_invoices(&invoices, state.applied());
    sort_invoices(&mut rows, None);
    assert_eq!(ids(&rows), vec![1, 3]);
}

#[test]
fn total_sort_toggles_between_ascending_and_descending() {
    let invoices = vec![
        InvoiceBuilder::new(1, "Acme").total("10.00").build(),
        InvoiceBuilder::new(2, "Acme").total("5.00").build(),
        InvoiceBuilder::new(3, "Acme").total("20.00").build(),
    ];
    let totals = |rows: &[&Invoice]| -> Vec<String> {
        rows.iter().map(|invoice| invoice.total.clone()).collect()
    };

    let ascending = SortSpec::request(None, SortColumn::Total);
    let mut rows: Vec<&Invoice> = invoices.iter().collect();
    sort_invoices(&mut rows, Some(ascending));
    assert_eq!(totals(&rows), vec!["5.00", "10.00", "20.00"]);

    let descending = SortSpec::request(Some(ascending), SortColumn::Total);
    let mut rows: Vec<&Invoice> = invoices.iter().collect();
    sort_invoices(&mut rows, Some(descending));
    assert_eq!(totals(&rows), vec!["20.00", "10.00", "5.00"]);
}

#[test]
fn keyword_matches_matter_name_when_client_differs() {
    let invoices = vec![
        InvoiceBuilder::new(1, "Beta Corp")
            .matter("Acme Holdings", "00101")
            .build(),
    ];
    let acme = FilterValues {
        keyword: "acme".to_owned(),
        ..FilterValues::default()
    };
    assert_eq!(filter_invoices(&invoices, &acme).len(), 1);

    let nothing = FilterValues {
        keyword: "zzz".to_owned(),
        ..FilterValues::default()
    };
    assert!(filter_invoices(&invoices, &nothing).is_empty());
}

#[test]
fn apply_then_reset_keeps_applied() {
    let initial = FilterValues {
        clients: vec!["Acme".to_owned()],
        ..FilterValues::default()
    };
    let mut state = FilterState::new(initial.clone());
    state.update_draft(|draft| draft.statuses = vec!["Paid".to_owned()]);
    state.apply();
    let applied = state.applied().clone();

    state.update_draft(|draft| draft.keyword = "diverged".to_owned());
    state.reset();

    assert_eq!(state.applied(), &applied);
    assert_eq!(state.draft(), &initial);
}

#[test]
fn chip_removal_rederives_results() {
    let invoices = vec![
        InvoiceBuilder::new(1, "Acme").status("Posted").build(),
        InvoiceBuilder::new(2, "Zeta").status("Paid").build(),
    ];
    let mut state = FilterState::default();
    state.set_applied(FilterValues {
        statuses: vec!["Paid".to_owned()],
        group_by_client: Some(false),
        ..FilterValues::default()
    });
    let mut cache = ResultsCache::new();
    let page = cache.derive(&invoices, 0, &state, None, PageRequest::default());
    assert_eq!(page.summary(), "Showing 1 of 1 invoices");

    state.remove_applied(FilterKey::Statuses);
    let page = cache.derive(&invoices, 0, &state, None, PageRequest::default());
    assert_eq!(page.summary(), "Showing 2 of 2 invoices");
    assert_eq!(cache.computations(), 2);
}

#[test]
fn grouped_view_defaults_on_and_orders_clients() {
    let invoices = vec![
        InvoiceBuilder::new(1, "Peter Gibbons").build(),
        InvoiceBuilder::new(2, "AH 3").build(),
        InvoiceBuilder::new(3, "Juniper Ridge Partners").build(),
        InvoiceBuilder::new(4, "AH 3").build(),
    ];
    let filters = FilterValues::default();
    let page = derive_results(
        &invoices,
        ResultQuery {
            filters: &filters,
            sort: Some(SortSpec::desc(SortColumn::BillNum)),
            page: PageRequest::new(1, 2),
        },
    );

    let PageBody::Grouped(groups) = &page.body else {
        panic!("grouping should be on by default");
    };
    let clients: Vec<&str> = groups.iter().map(|group| group.client.as_str()).collect();
    assert_eq!(clients, vec!["AH 3", "Juniper Ridge Partners"]);
    let ah3: Vec<i64> = groups[0]
        .invoices
        .iter()
        .map(|invoice| invoice.invoice_id.get())
        .collect();
    assert_eq!(ah3, vec![4, 2]);
    assert_eq!(page.summary(), "Showing 2 of 3 clients");
    assert_eq!(page.page_count, 2);
}
