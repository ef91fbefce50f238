// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod detail;
mod drawer;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use detail::DetailUiState;
use drawer::DrawerUiState;
use prebill_app::{
    AppCommand, AppEvent, AppMode, AppState, Comment, DEFAULT_PER_PAGE, ExpandedGroups, FeeEntry,
    FeeEntryId, FilterState, FilterValues, FormPayload, Invoice, InvoiceId, KeyValueStore,
    PageBody, PageRequest, ResultPage, ResultsCache, SortColumn, SortDirection, SortSpec, View,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use time::macros::format_description;

const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";
const GROUP_EXPANDED: &str = "▾";
const GROUP_COLLAPSED: &str = "▸";
const EMPTY_RESULTS: &str = "No pre-bills found. Try adjusting your filters.";
const HOLD_TYPE_LABEL: &str = "Hold Type";
const LANDING_COLUMN_COUNT: usize = SortColumn::ALL.len() + 1;
const TOTAL_COLUMN: usize = 5;

/// The invoice collection plus a generation that changes whenever the
/// collection is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvoiceSnapshot {
    pub generation: u64,
    pub invoices: Vec<Invoice>,
}

pub trait AppRuntime {
    fn load_invoices(&mut self) -> Result<InvoiceSnapshot>;
    fn load_fee_entries(&mut self, invoice_id: InvoiceId) -> Result<Vec<FeeEntry>>;
    fn load_comments(&mut self, invoice_id: InvoiceId) -> Result<Vec<Comment>>;
    fn submit_form(&mut self, invoice_id: InvoiceId, payload: &FormPayload) -> Result<()>;
    fn delete_fee_entry(&mut self, entry_id: FeeEntryId) -> Result<()>;
    fn preferences(&mut self) -> &mut dyn KeyValueStore;
}

/// Starting point for the landing view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingOptions {
    pub per_page: usize,
    pub filters: FilterValues,
    pub sort: Option<SortSpec>,
}

impl Default for LandingOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            filters: FilterValues::default(),
            sort: Some(SortSpec::desc(SortColumn::CreatedAt)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LandingRow {
    Group {
        client: String,
        count: usize,
        total_cents: i64,
    },
    Invoice {
        invoice: Invoice,
        nested: bool,
    },
}

#[derive(Debug, Default)]
struct LandingUiState {
    filters: FilterState,
    sort: Option<SortSpec>,
    page: usize,
    per_page: usize,
    seen_revision: u64,
    cache: ResultsCache,
    expanded: ExpandedGroups,
    result: Option<ResultPage>,
    rows: Vec<LandingRow>,
    selected_row: usize,
    selected_col: usize,
    chip_cursor: usize,
}

#[derive(Debug, Default)]
struct ViewData {
    invoices: Vec<Invoice>,
    generation: u64,
    landing: LandingUiState,
    drawer: DrawerUiState,
    detail: DetailUiState,
    status_token: u64,
}

impl ViewData {
    fn new(options: &LandingOptions) -> Self {
        Self {
            landing: LandingUiState {
                filters: FilterState::new(options.filters.clone()),
                sort: options.sort,
                page: 1,
                per_page: options.per_page.max(1),
                ..LandingUiState::default()
            },
            ..Self::default()
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: &LandingOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = bootstrap(state, runtime, &mut view_data) {
        tracing::warn!("initial load failed: {error:#}");
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn bootstrap<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    view_data.landing.expanded = ExpandedGroups::load(runtime.preferences());
    reload_invoices(runtime, view_data)?;
    if let View::Detail(invoice_id) = state.view {
        detail::load_detail(runtime, view_data, invoice_id)?;
    }
    Ok(())
}

fn reload_invoices<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let snapshot = runtime.load_invoices().context("load invoices")?;
    view_data.invoices = snapshot.invoices;
    view_data.generation = snapshot.generation;
    refresh_landing(view_data);
    Ok(())
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = state.dispatch(command);
    for event in &events {
        match event {
            AppEvent::ViewChanged(View::Detail(invoice_id)) => {
                if let Err(error) = detail::load_detail(runtime, view_data, *invoice_id) {
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("load failed: {error}"),
                    );
                }
            }
            AppEvent::ViewChanged(View::Landing) => refresh_landing(view_data),
            _ => {}
        }
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

/// Re-derives the visible page. A new applied-filter revision sends the
/// view back to page 1.
fn refresh_landing(view_data: &mut ViewData) {
    let landing = &mut view_data.landing;
    let revision = landing.filters.revision();
    if revision != landing.seen_revision {
        landing.seen_revision = revision;
        landing.page = 1;
    }

    let mut result = derive_landing_page(landing, &view_data.invoices, view_data.generation);
    if result.page_count > 0 && landing.page > result.page_count {
        // A reload can shrink the data under the current page.
        landing.page = result.page_count;
        result = derive_landing_page(landing, &view_data.invoices, view_data.generation);
    }

    landing.rows = landing_rows(&result, &landing.expanded);
    landing.result = Some(result);
    landing.selected_row = landing
        .selected_row
        .min(landing.rows.len().saturating_sub(1));
    let chips = landing.filters.applied().chips().len();
    landing.chip_cursor = landing.chip_cursor.min(chips.saturating_sub(1));
}

fn derive_landing_page(
    landing: &mut LandingUiState,
    invoices: &[Invoice],
    generation: u64,
) -> ResultPage {
    let request = PageRequest::new(landing.page.max(1), landing.per_page);
    landing
        .cache
        .derive(invoices, generation, &landing.filters, landing.sort, request)
        .clone()
}

fn landing_rows(result: &ResultPage, expanded: &ExpandedGroups) -> Vec<LandingRow> {
    match &result.body {
        PageBody::Flat(invoices) => invoices
            .iter()
            .map(|invoice| LandingRow::Invoice {
                invoice: invoice.clone(),
                nested: false,
            })
            .collect(),
        PageBody::Grouped(groups) => {
            let mut rows = Vec::new();
            for group in groups {
                rows.push(LandingRow::Group {
                    client: group.client.clone(),
                    count: group.invoices.len(),
                    total_cents: group.total_cents(),
                });
                if expanded.is_expanded(&group.client) {
                    rows.extend(group.invoices.iter().map(|invoice| LandingRow::Invoice {
                        invoice: invoice.clone(),
                        nested: true,
                    }));
                }
            }
            rows
        }
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.view {
        View::Detail(invoice_id) => {
            detail::handle_detail_key(state, runtime, view_data, internal_tx, invoice_id, key);
        }
        View::Landing if state.mode == AppMode::Filters => {
            drawer::handle_drawer_key(state, view_data, internal_tx, key);
        }
        View::Landing => handle_landing_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_landing_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            move_row(view_data, 1);
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            move_row(view_data, -1);
        }
        (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => {
            move_col(view_data, -1);
        }
        (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => {
            move_col(view_data, 1);
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) => view_data.landing.selected_row = 0,
        (KeyCode::Char('G'), _) => {
            view_data.landing.selected_row = view_data.landing.rows.len().saturating_sub(1);
        }
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            let status = request_sort(view_data);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Char('v'), KeyModifiers::NONE) => {
            let grouped = !view_data.landing.filters.applied().grouping_enabled();
            view_data.landing.filters.set_grouping(grouped);
            view_data.landing.selected_row = 0;
            refresh_landing(view_data);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("view: {}", view_mode_label(grouped)),
            );
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => drawer::open_drawer(state, view_data),
        (KeyCode::Char(']'), _) | (KeyCode::Char('n'), KeyModifiers::NONE) | (KeyCode::PageDown, _) => {
            let status = change_page(view_data, 1);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Char('['), _) | (KeyCode::Char('p'), KeyModifiers::NONE) | (KeyCode::PageUp, _) => {
            let status = change_page(view_data, -1);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Enter, _) => activate_row(state, runtime, view_data, internal_tx, true),
        (KeyCode::Char(' '), _) => activate_row(state, runtime, view_data, internal_tx, false),
        (KeyCode::Char('E'), _) => {
            let status = expand_page_groups(runtime, view_data);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Char('C'), _) => {
            view_data.landing.expanded.collapse_all(runtime.preferences());
            refresh_landing(view_data);
            emit_status(state, view_data, internal_tx, "all groups collapsed");
        }
        (KeyCode::Tab, _) => move_chip_cursor(view_data, 1),
        (KeyCode::BackTab, _) => move_chip_cursor(view_data, -1),
        (KeyCode::Char('x'), KeyModifiers::NONE) => {
            let status = remove_selected_chip(view_data);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Char('X'), _) => {
            view_data.landing.filters.set_applied(FilterValues::default());
            refresh_landing(view_data);
            emit_status(state, view_data, internal_tx, "all filters cleared");
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            let status = match reload_invoices(runtime, view_data) {
                Ok(()) => format!("reloaded {} invoices", view_data.invoices.len()),
                Err(error) => format!("load failed: {error}"),
            };
            emit_status(state, view_data, internal_tx, status);
        }
        _ => {}
    }
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let landing = &mut view_data.landing;
    if landing.rows.is_empty() {
        landing.selected_row = 0;
        return;
    }
    let last = landing.rows.len() as isize - 1;
    landing.selected_row = (landing.selected_row as isize + delta).clamp(0, last) as usize;
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let landing = &mut view_data.landing;
    let last = LANDING_COLUMN_COUNT as isize - 1;
    landing.selected_col = (landing.selected_col as isize + delta).clamp(0, last) as usize;
}

fn request_sort(view_data: &mut ViewData) -> String {
    let Some(column) = SortColumn::ALL.get(view_data.landing.selected_col).copied() else {
        return format!("{HOLD_TYPE_LABEL} is not sortable");
    };
    let spec = SortSpec::request(view_data.landing.sort, column);
    view_data.landing.sort = Some(spec);
    refresh_landing(view_data);
    format!(
        "sorted by {} {}",
        column.label(),
        sort_marker(spec.direction)
    )
}

fn change_page(view_data: &mut ViewData, delta: isize) -> String {
    let landing = &mut view_data.landing;
    let page_count = landing
        .result
        .as_ref()
        .map_or(0, |result| result.page_count);
    if delta < 0 && landing.page <= 1 {
        return "already on the first page".to_owned();
    }
    if delta > 0 && landing.page >= page_count {
        return "already on the last page".to_owned();
    }
    landing.page = landing.page.saturating_add_signed(delta).max(1);
    landing.selected_row = 0;
    let page = landing.page;
    refresh_landing(view_data);
    format!("page {page} of {}", page_count.max(1))
}

fn activate_row<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    open_invoices: bool,
) {
    let landing = &view_data.landing;
    match landing.rows.get(landing.selected_row) {
        Some(LandingRow::Group { client, .. }) => {
            let client = client.clone();
            let expanded = view_data
                .landing
                .expanded
                .toggle(&client, runtime.preferences());
            refresh_landing(view_data);
            let verb = if expanded { "expanded" } else { "collapsed" };
            emit_status(state, view_data, internal_tx, format!("{client} {verb}"));
        }
        Some(LandingRow::Invoice { invoice, .. }) if open_invoices => {
            let invoice_id = invoice.invoice_id;
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                AppCommand::OpenInvoice(invoice_id),
                internal_tx,
            );
        }
        Some(LandingRow::Invoice { .. }) | None => {}
    }
}

fn expand_page_groups<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> String {
    let Some(PageBody::Grouped(groups)) = view_data.landing.result.as_ref().map(|r| &r.body)
    else {
        return "switch to Group by Client to expand groups".to_owned();
    };
    let clients: Vec<String> = groups.iter().map(|group| group.client.clone()).collect();
    view_data
        .landing
        .expanded
        .expand_all(clients.iter().map(String::as_str), runtime.preferences());
    refresh_landing(view_data);
    format!("{} groups expanded", clients.len())
}

fn move_chip_cursor(view_data: &mut ViewData, delta: isize) {
    let chips = view_data.landing.filters.applied().chips().len();
    if chips == 0 {
        view_data.landing.chip_cursor = 0;
        return;
    }
    let next = (view_data.landing.chip_cursor as isize + delta).rem_euclid(chips as isize);
    view_data.landing.chip_cursor = next as usize;
}

fn remove_selected_chip(view_data: &mut ViewData) -> String {
    let chips = view_data.landing.filters.applied().chips();
    let Some(chip) = chips.get(view_data.landing.chip_cursor) else {
        return "no filters applied".to_owned();
    };
    view_data.landing.filters.remove_applied(chip.key);
    refresh_landing(view_data);
    format!("removed {}", chip.text())
}

fn view_mode_label(grouped: bool) -> &'static str {
    if grouped {
        "Group by Client"
    } else {
        "No Grouping"
    }
}

fn sort_marker(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => SORT_MARK_ASC,
        SortDirection::Desc => SORT_MARK_DESC,
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    match state.view {
        View::Landing => {
            let header = Paragraph::new(landing_header_text(view_data)).block(
                Block::default()
                    .title("Prebilling Management")
                    .borders(Borders::ALL),
            );
            frame.render_widget(header, layout[0]);
            render_landing(frame, layout[1], view_data);
        }
        View::Detail(invoice_id) => {
            detail::render_detail_header(frame, layout[0], state, view_data, invoice_id);
            detail::render_detail_body(frame, layout[1], state, view_data, invoice_id);
        }
    }

    let status = status_text(state, view_data);
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if state.view == View::Landing && state.mode == AppMode::Filters {
        let area = drawer_rect(frame.area());
        frame.render_widget(Clear, area);
        let drawer = Paragraph::new(drawer::render_drawer_text(view_data)).block(
            Block::default()
                .title("Filter Pre-Bills")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(drawer, area);
    }
}

fn landing_header_text(view_data: &ViewData) -> String {
    let applied = view_data.landing.filters.applied();
    let sort = match view_data.landing.sort {
        Some(spec) => format!("{} {}", spec.column.label(), sort_marker(spec.direction)),
        None => "unsorted".to_owned(),
    };
    format!(
        "Filters ({}) | {} | sort: {sort}",
        applied.active_count(),
        view_mode_label(applied.grouping_enabled())
    )
}

fn render_landing(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let landing = &view_data.landing;
    frame.render_widget(Paragraph::new(chips_text(landing)), layout[0]);

    let title = match &landing.result {
        Some(result) => format!(
            "{} invoices | {}",
            result.total_invoices,
            format_money(result.total_amount_cents)
        ),
        None => "invoices".to_owned(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if landing.rows.is_empty() {
        let empty = Paragraph::new(EMPTY_RESULTS)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, layout[1]);
    } else {
        let header = Row::new((0..LANDING_COLUMN_COUNT).map(|column| {
            Cell::from(landing_header_label(column, landing.sort)).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }));
        let rows = landing.rows.iter().enumerate().map(|(row_index, row)| {
            let selected_row = row_index == landing.selected_row;
            let cells = landing_row_cells(row, &landing.expanded)
                .into_iter()
                .enumerate()
                .map(|(column_index, text)| {
                    let mut style = Style::default();
                    if matches!(row, LandingRow::Group { .. }) {
                        style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
                    }
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column_index == landing.selected_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(text).style(style)
                })
                .collect::<Vec<_>>();
            Row::new(cells)
        });
        let widths = [
            Constraint::Min(28),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(11),
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(22),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(block);
        frame.render_widget(table, layout[1]);
    }

    frame.render_widget(Paragraph::new(footer_text(landing)), layout[2]);
}

fn landing_header_label(column_index: usize, sort: Option<SortSpec>) -> String {
    let Some(column) = SortColumn::ALL.get(column_index).copied() else {
        return HOLD_TYPE_LABEL.to_owned();
    };
    let mut label = column.label().to_owned();
    if let Some(spec) = sort
        && spec.column == column
    {
        label.push(' ');
        label.push_str(sort_marker(spec.direction));
    }
    label
}

fn landing_row_cells(row: &LandingRow, expanded: &ExpandedGroups) -> Vec<String> {
    match row {
        LandingRow::Group {
            client,
            count,
            total_cents,
        } => {
            let marker = if expanded.is_expanded(client) {
                GROUP_EXPANDED
            } else {
                GROUP_COLLAPSED
            };
            let mut cells = vec![String::new(); LANDING_COLUMN_COUNT];
            cells[0] = format!("{marker} {client} ({count})");
            cells[TOTAL_COLUMN] = format_money(*total_cents);
            cells
        }
        LandingRow::Invoice { invoice, nested } => {
            let indent = if *nested { "    " } else { "" };
            vec![
                format!("{indent}{}", invoice.matter_label()),
                invoice.bill_num.clone(),
                format_date_cell(invoice.created_at()),
                format_date_cell(invoice.bill_date()),
                invoice.responsible_attorney().to_owned(),
                format_money(invoice.total_cents()),
                invoice.status.to_string(),
                invoice.hold_type.clone().unwrap_or_default(),
            ]
        }
    }
}

fn chips_text(landing: &LandingUiState) -> String {
    let chips = landing.filters.applied().chips();
    if chips.is_empty() {
        return "no filters applied".to_owned();
    }
    let parts = chips
        .iter()
        .enumerate()
        .map(|(index, chip)| {
            if index == landing.chip_cursor {
                format!("[{}]", chip.text())
            } else {
                chip.text()
            }
        })
        .collect::<Vec<_>>();
    format!("{} | x remove | X clear all", parts.join("  "))
}

fn footer_text(landing: &LandingUiState) -> String {
    let Some(result) = &landing.result else {
        return String::new();
    };
    let mut text = format!(
        "{} | page {} of {}",
        result.summary(),
        landing.page,
        result.page_count.max(1)
    );
    if landing.page > 1 {
        text.push_str(" | [ prev");
    }
    if landing.page < result.page_count {
        text.push_str(" | ] next");
    }
    text
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let mode = match state.mode {
        AppMode::Nav => "NAV",
        AppMode::Filters => "FILTERS",
        AppMode::Form(_) => "FORM",
    };
    let hints = match (state.view, state.mode) {
        (_, AppMode::Form(_)) => "tab field | enter save | esc cancel",
        (View::Landing, AppMode::Filters) => {
            if view_data.drawer.editing.is_some() {
                "type value | enter keep | esc cancel"
            } else {
                "j/k field | h/l option | space toggle | p preset | a apply | esc close"
            }
        }
        (View::Landing, _) => {
            "j/k h/l | enter open | s sort | v view | f filters | tab x X chips | [ ] page | ctrl+q"
        }
        (View::Detail(_), _) => {
            if view_data.detail.search_active {
                "type search | enter keep | esc clear"
            } else {
                "tab 1-8 tabs | j/k | / search | e edit | a note | d delete | c comments | m more | esc back"
            }
        }
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    let dollars = group_thousands(absolute / 100);
    let cents_component = absolute % 100;
    format!("{sign}${dollars}.{cents_component:02}")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `MM/DD/YYYY` in UTC, blank when the source timestamp did not parse.
fn format_date_cell(value: Option<OffsetDateTime>) -> String {
    let format = format_description!("[month]/[day]/[year]");
    value
        .and_then(|at| at.format(&format).ok())
        .unwrap_or_default()
}

fn drawer_rect(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area)[1]
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
