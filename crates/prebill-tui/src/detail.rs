// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    AppRuntime, InternalEvent, ViewData, centered_rect, dispatch_and_refresh, emit_status,
    format_date_cell, format_money,
};
use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prebill_app::{
    AppCommand, AppMode, AppState, Comment, CommentInput, DetailTab, FeeEntry, FeeEntryFormInput,
    FeeNoteInput, FormKind, FormPayload, Invoice, InvoiceId, StatusVariant, format_date_input,
    parse_amount_cents, parse_date_input, parse_number,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::sync::mpsc::Sender;
use time::macros::format_description;

const NOT_FOUND: &str = "Invoice not found";

const FEE_FORM_FIELDS: [&str; 9] = [
    "Date",
    "Services",
    "Attorney",
    "Activity Code",
    "Task Code",
    "Event Code",
    "Rate",
    "Hours",
    "No Charge",
];
const NOTE_FORM_FIELDS: [&str; 1] = ["Note"];
const COMMENT_FORM_FIELDS: [&str; 1] = ["Comment"];

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct DetailUiState {
    pub(crate) invoice_id: Option<InvoiceId>,
    pub(crate) fee_entries: Vec<FeeEntry>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) search: String,
    pub(crate) search_active: bool,
    pub(crate) see_more: bool,
    pub(crate) selected_entry: usize,
    pub(crate) form: Option<FormUiState>,
}

impl DetailUiState {
    /// Entries matching the search box, in display order.
    pub(crate) fn visible_entries(&self) -> Vec<&FeeEntry> {
        self.fee_entries
            .iter()
            .filter(|entry| entry.matches_search(&self.search))
            .collect()
    }

    fn selected_entry(&self) -> Option<&FeeEntry> {
        self.visible_entries().get(self.selected_entry).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormUiState {
    pub(crate) kind: FormKind,
    pub(crate) field_index: usize,
    pub(crate) values: Vec<String>,
}

impl FormUiState {
    fn blank(kind: FormKind) -> Self {
        Self {
            kind,
            field_index: 0,
            values: vec![String::new(); form_field_labels(kind).len()],
        }
    }

    fn for_entry(entry: &FeeEntry) -> Self {
        Self {
            kind: FormKind::EditFeeEntry(entry.id),
            field_index: 0,
            values: vec![
                format_date_input(entry.date),
                entry.services.clone(),
                entry.attorney.clone(),
                entry.activity_code.clone(),
                entry.task_code.clone(),
                entry.event_code.clone(),
                format_decimal_cents(entry.rate_cents),
                entry.hours.to_string(),
                if entry.no_charge { "yes" } else { "no" }.to_owned(),
            ],
        }
    }

    fn field(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or_default()
    }
}

fn form_field_labels(kind: FormKind) -> &'static [&'static str] {
    match kind {
        FormKind::EditFeeEntry(_) => &FEE_FORM_FIELDS,
        FormKind::FeeNote(_) => &NOTE_FORM_FIELDS,
        FormKind::Comment => &COMMENT_FORM_FIELDS,
    }
}

fn form_title(kind: FormKind) -> &'static str {
    match kind {
        FormKind::EditFeeEntry(_) => "Edit Fee Entry",
        FormKind::FeeNote(_) => "Add Note",
        FormKind::Comment => "Write a comment",
    }
}

fn format_decimal_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let absolute = cents.unsigned_abs();
    format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
}

fn parse_yes_no(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "x" => Some(true),
        "" | "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Turns typed form text into a payload. Field-level parse problems are
/// reported here; business rules are left to the payload's own validation.
pub(crate) fn form_payload(form: &FormUiState) -> Result<FormPayload> {
    match form.kind {
        FormKind::EditFeeEntry(entry_id) => {
            let date = parse_date_input(form.field(0))
                .ok_or_else(|| anyhow!("date must be YYYY-MM-DD, e.g. 2026-01-26"))?;
            let rate_cents = parse_amount_cents(form.field(6))
                .ok_or_else(|| anyhow!("rate must be a dollar amount like 200.73"))?;
            let hours = parse_number(form.field(7))
                .ok_or_else(|| anyhow!("hours must be a number like 1.5"))?;
            let no_charge = parse_yes_no(form.field(8))
                .ok_or_else(|| anyhow!("no charge must be yes or no"))?;
            Ok(FormPayload::EditFeeEntry(
                entry_id,
                FeeEntryFormInput {
                    date,
                    services: form.field(1).to_owned(),
                    attorney: form.field(2).to_owned(),
                    activity_code: form.field(3).to_owned(),
                    task_code: form.field(4).to_owned(),
                    event_code: form.field(5).to_owned(),
                    rate_cents,
                    hours,
                    no_charge,
                },
            ))
        }
        FormKind::FeeNote(entry_id) => Ok(FormPayload::FeeNote(
            entry_id,
            FeeNoteInput {
                body: form.field(0).to_owned(),
            },
        )),
        FormKind::Comment => Ok(FormPayload::Comment(CommentInput {
            body: form.field(0).to_owned(),
        })),
    }
}

/// Pulls fee entries and comments for the invoice now on screen.
pub(crate) fn load_detail<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    invoice_id: InvoiceId,
) -> Result<()> {
    let switching = view_data.detail.invoice_id != Some(invoice_id);
    if switching {
        view_data.detail = DetailUiState {
            invoice_id: Some(invoice_id),
            ..DetailUiState::default()
        };
    }
    if find_invoice(view_data, invoice_id).is_none() {
        view_data.detail.fee_entries.clear();
        view_data.detail.comments.clear();
        return Ok(());
    }
    view_data.detail.fee_entries = runtime.load_fee_entries(invoice_id)?;
    view_data.detail.comments = runtime.load_comments(invoice_id)?;
    let visible = view_data.detail.visible_entries().len();
    view_data.detail.selected_entry = view_data
        .detail
        .selected_entry
        .min(visible.saturating_sub(1));
    Ok(())
}

pub(crate) fn find_invoice(view_data: &ViewData, invoice_id: InvoiceId) -> Option<&Invoice> {
    view_data
        .invoices
        .iter()
        .find(|invoice| invoice.invoice_id == invoice_id)
}

pub(crate) fn handle_detail_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    invoice_id: InvoiceId,
    key: KeyEvent,
) {
    if matches!(state.mode, AppMode::Form(_)) {
        handle_form_key(state, runtime, view_data, internal_tx, invoice_id, key);
        return;
    }

    if view_data.detail.search_active {
        handle_search_key(view_data, key);
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                AppCommand::BackToLanding,
                internal_tx,
            );
        }
        (KeyCode::Tab, _) | (KeyCode::Char('f'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextTab, internal_tx);
        }
        (KeyCode::BackTab, _) | (KeyCode::Char('b'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevTab, internal_tx);
        }
        (KeyCode::Char(digit @ '1'..='8'), KeyModifiers::NONE) => {
            let index = digit as usize - '1' as usize;
            if let Some(tab) = DetailTab::ALL.get(index).copied() {
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    AppCommand::SelectTab(tab),
                    internal_tx,
                );
            }
        }
        (KeyCode::Char('c'), KeyModifiers::NONE) => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                AppCommand::ToggleComments,
                internal_tx,
            );
        }
        (KeyCode::Char('n'), KeyModifiers::NONE) => {
            if !state.comments_open {
                emit_status(state, view_data, internal_tx, "open comments with c first");
                return;
            }
            open_form(state, view_data, FormUiState::blank(FormKind::Comment));
        }
        _ if find_invoice(view_data, invoice_id).is_none() => {}
        _ if state.detail_tab != DetailTab::Fees => {}
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
            move_entry_cursor(view_data, 1);
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
            move_entry_cursor(view_data, -1);
        }
        (KeyCode::Char('/'), KeyModifiers::NONE) => {
            view_data.detail.search_active = true;
        }
        (KeyCode::Char('m'), KeyModifiers::NONE) => {
            view_data.detail.see_more = !view_data.detail.see_more;
        }
        (KeyCode::Char('e'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
            match view_data.detail.selected_entry().map(FormUiState::for_entry) {
                Some(form) => open_form(state, view_data, form),
                None => emit_status(state, view_data, internal_tx, "no fee entry selected"),
            }
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            match view_data.detail.selected_entry().map(|entry| entry.id) {
                Some(entry_id) => open_form(
                    state,
                    view_data,
                    FormUiState::blank(FormKind::FeeNote(entry_id)),
                ),
                None => emit_status(state, view_data, internal_tx, "no fee entry selected"),
            }
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            let Some(entry_id) = view_data.detail.selected_entry().map(|entry| entry.id) else {
                emit_status(state, view_data, internal_tx, "no fee entry selected");
                return;
            };
            let status = match runtime
                .delete_fee_entry(entry_id)
                .and_then(|()| load_detail(runtime, view_data, invoice_id))
            {
                Ok(()) => format!("fee entry {entry_id} deleted"),
                Err(error) => format!("delete failed: {error}"),
            };
            emit_status(state, view_data, internal_tx, status);
        }
        _ => {}
    }
}

fn move_entry_cursor(view_data: &mut ViewData, delta: isize) {
    let len = view_data.detail.visible_entries().len();
    if len == 0 {
        view_data.detail.selected_entry = 0;
        return;
    }
    let next = (view_data.detail.selected_entry as isize + delta).clamp(0, len as isize - 1);
    view_data.detail.selected_entry = next as usize;
}

fn handle_search_key(view_data: &mut ViewData, key: KeyEvent) {
    let detail = &mut view_data.detail;
    match key.code {
        KeyCode::Esc => {
            detail.search.clear();
            detail.search_active = false;
        }
        KeyCode::Enter => detail.search_active = false,
        KeyCode::Backspace => {
            detail.search.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            detail.search.push(ch);
        }
        _ => {}
    }
    let visible = detail.visible_entries().len();
    detail.selected_entry = detail.selected_entry.min(visible.saturating_sub(1));
}

fn open_form(state: &mut AppState, view_data: &mut ViewData, form: FormUiState) {
    state.dispatch(AppCommand::OpenForm(form.kind));
    view_data.detail.form = Some(form);
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    invoice_id: InvoiceId,
    key: KeyEvent,
) {
    let Some(form) = view_data.detail.form.as_mut() else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };
    let field_count = form.values.len().max(1);

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.detail.form = None;
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            emit_status(state, view_data, internal_tx, "form canceled");
        }
        (KeyCode::Tab, _) | (KeyCode::Down, _) => {
            form.field_index = (form.field_index + 1) % field_count;
        }
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
            form.field_index = (form.field_index + field_count - 1) % field_count;
        }
        (KeyCode::Backspace, _) => {
            if let Some(value) = form.values.get_mut(form.field_index) {
                value.pop();
            }
        }
        (KeyCode::Enter, _) => {
            let submitted = form_payload(form).and_then(|payload| {
                runtime.submit_form(invoice_id, &payload)?;
                Ok(payload.kind())
            });
            match submitted {
                Ok(kind) => {
                    view_data.detail.form = None;
                    state.dispatch(AppCommand::ExitToNav);
                    let status = match load_detail(runtime, view_data, invoice_id) {
                        Ok(()) => saved_message(kind).to_owned(),
                        Err(error) => format!("saved; reload failed: {error}"),
                    };
                    emit_status(state, view_data, internal_tx, status);
                }
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("save failed: {error}"));
                }
            }
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(value) = form.values.get_mut(form.field_index) {
                value.push(ch);
            }
        }
        _ => {}
    }
}

fn saved_message(kind: FormKind) -> &'static str {
    match kind {
        FormKind::EditFeeEntry(_) => "fee entry saved",
        FormKind::FeeNote(_) => "note added",
        FormKind::Comment => "comment added",
    }
}

fn status_badge_style(variant: StatusVariant) -> Style {
    let background = match variant {
        StatusVariant::Primary => Color::Blue,
        StatusVariant::Secondary => Color::Green,
        StatusVariant::Warning => Color::Yellow,
        StatusVariant::Default => Color::Gray,
    };
    Style::default()
        .fg(Color::Black)
        .bg(background)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn render_detail_header(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    invoice_id: InvoiceId,
) {
    let Some(invoice) = find_invoice(view_data, invoice_id) else {
        let header = Paragraph::new(format!("invoice {invoice_id}"))
            .block(Block::default().title(NOT_FOUND).borders(Borders::ALL));
        frame.render_widget(header, area);
        return;
    };

    let title = Line::from(vec![
        Span::raw(format!("#{} | {} | ", invoice.bill_num, invoice.bill_code)),
        Span::styled(
            format!(" {} ", invoice.status),
            status_badge_style(invoice.status.variant()),
        ),
    ]);
    let selected = DetailTab::ALL
        .iter()
        .position(|tab| *tab == state.detail_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(DetailTab::ALL.iter().map(|tab| tab.label()))
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, area);
}

pub(crate) fn render_detail_body(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    invoice_id: InvoiceId,
) {
    let Some(invoice) = find_invoice(view_data, invoice_id) else {
        let missing = Paragraph::new(NOT_FOUND)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(missing, area);
        return;
    };

    let (main, comments) = if state.comments_open {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    if state.detail_tab == DetailTab::Fees {
        render_fees_tab(frame, main, invoice, &view_data.detail);
    } else {
        let placeholder = Paragraph::new(placeholder_text(state.detail_tab))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, main);
    }

    if let Some(comments_area) = comments {
        let panel = Paragraph::new(render_comments_text(&view_data.detail.comments)).block(
            Block::default()
                .title("Comments & Activities")
                .borders(Borders::ALL),
        );
        frame.render_widget(panel, comments_area);
    }

    if let (AppMode::Form(_), Some(form)) = (state.mode, &view_data.detail.form) {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(render_form_text(form)).block(
            Block::default()
                .title(form_title(form.kind))
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(modal, area);
    }
}

pub(crate) fn placeholder_text(tab: DetailTab) -> String {
    format!("{} content coming soon", tab.label())
}

fn render_fees_tab(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    invoice: &Invoice,
    detail: &DetailUiState,
) {
    let card = render_matter_card_text(invoice, detail.see_more);
    let card_height = card.lines().count() as u16 + 2;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(card_height),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(area);

    let card_widget =
        Paragraph::new(card).block(Block::default().title("Matter").borders(Borders::ALL));
    frame.render_widget(card_widget, layout[0]);

    let entries = detail.visible_entries();
    let search = if detail.search_active {
        format!("{}_", detail.search)
    } else if detail.search.is_empty() {
        "Search... (/)".to_owned()
    } else {
        detail.search.clone()
    };
    let search_widget = Paragraph::new(search).block(
        Block::default()
            .title(billable_time_title(detail))
            .borders(Borders::ALL),
    );
    frame.render_widget(search_widget, layout[1]);

    let header = Row::new(
        [
            "Date",
            "Services",
            "Attorney",
            "Activity",
            "Task Code",
            "Event Code",
            "Rate",
            "Hours",
            "Amount",
            "No Charge",
            "Notes",
        ]
        .into_iter()
        .map(|label| {
            Cell::from(label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    );
    let rows = entries.iter().enumerate().map(|(index, entry)| {
        let style = if index == detail.selected_entry {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        Row::new(fee_entry_cells(entry)).style(style)
    });
    let widths = [
        Constraint::Length(10),
        Constraint::Min(24),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, layout[2]);
}

pub(crate) fn billable_time_title(detail: &DetailUiState) -> String {
    format!("Billable Time ({})", detail.visible_entries().len())
}

fn fee_entry_cells(entry: &FeeEntry) -> Vec<String> {
    let date_format = format_description!("[month]/[day]/[year]");
    vec![
        entry.date.format(&date_format).unwrap_or_default(),
        entry.services.clone(),
        entry.attorney.clone(),
        entry.activity_code.clone(),
        entry.task_code.clone(),
        entry.event_code.clone(),
        format_money(entry.rate_cents),
        format!("{:.2}", entry.hours),
        format_money(entry.amount_cents),
        if entry.no_charge { "yes" } else { "" }.to_owned(),
        match entry.notes.len() {
            0 => String::new(),
            count => count.to_string(),
        },
    ]
}

pub(crate) fn render_matter_card_text(invoice: &Invoice, see_more: bool) -> String {
    let mut lines = vec![
        format!("Matter: {}", invoice.matter_label()),
        format!("Billing Attorney: {}", invoice.responsible_attorney()),
        format!("Matter Trust Bal: {}", format_money(invoice.balance_cents())),
    ];
    if see_more {
        let client = &invoice.matter.client;
        lines.push(if client.clt_code.is_empty() {
            format!("Client: {}", client.name)
        } else {
            format!("Client: {} ({})", client.name, client.clt_code)
        });
        lines.push(format!(
            "Billing Method: {}",
            invoice.matter.metadata.billing_method
        ));
        lines.push(format!(
            "Fees Through: {}",
            format_date_cell(invoice.fee_thru())
        ));
        if let Some(hold) = &invoice.hold_type {
            let reason = invoice.hold_reason.as_deref().unwrap_or("-");
            lines.push(format!("Hold: {hold} ({reason})"));
        }
        lines.push("m: see less".to_owned());
    } else {
        lines.push("m: see more".to_owned());
    }
    lines.join("\n")
}

pub(crate) fn render_comments_text(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return "No comments yet\n\nn: write a comment".to_owned();
    }
    let date_format = format_description!("[month]/[day]/[year] [hour]:[minute]");
    let mut lines: Vec<String> = comments
        .iter()
        .map(|comment| {
            format!(
                "{} {}: {}",
                comment.author,
                comment.created_at.format(&date_format).unwrap_or_default(),
                comment.body
            )
        })
        .collect();
    lines.push(String::new());
    lines.push("n: write a comment".to_owned());
    lines.join("\n")
}

pub(crate) fn render_form_text(form: &FormUiState) -> String {
    let mut lines: Vec<String> = form_field_labels(form.kind)
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let value = form.field(index);
            if index == form.field_index {
                format!("> {label}: {value}_")
            } else {
                format!("  {label}: {value}")
            }
        })
        .collect();
    lines.push(String::new());
    lines.push("enter save | tab next field | esc cancel".to_owned());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{
        FormUiState, billable_time_title, form_payload, placeholder_text, render_form_text,
        render_matter_card_text,
    };
    use crate::tests::{fee_entry, view_data_with_invoices};
    use prebill_app::{DetailTab, FeeEntryId, FormKind, FormPayload};
    use time::macros::date;

    #[test]
    fn fee_form_round_trips_entry_fields() {
        let entry = fee_entry(7, "Draft closing checklist");
        let form = FormUiState::for_entry(&entry);
        assert_eq!(form.values[0], "2026-01-26");
        assert_eq!(form.values[6], "200.73");

        let FormPayload::EditFeeEntry(id, input) =
            form_payload(&form).expect("seeded form should parse")
        else {
            panic!("expected fee entry payload");
        };
        assert_eq!(id, FeeEntryId::new(7));
        assert_eq!(input.date, date!(2026 - 01 - 26));
        assert_eq!(input.rate_cents, 20_073);
        assert_eq!(input.hours, 1.5);
        assert!(!input.no_charge);
    }

    #[test]
    fn fee_form_reports_unparsable_fields() {
        let mut form = FormUiState::for_entry(&fee_entry(7, "Review"));
        form.values[7] = "lots".to_owned();
        let error = form_payload(&form).expect_err("hours must parse");
        assert!(error.to_string().contains("hours must be a number"));

        form.values[7] = "2".to_owned();
        form.values[0] = "01/26/2026".to_owned();
        let error = form_payload(&form).expect_err("date must parse");
        assert!(error.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn note_form_renders_cursor_on_first_field() {
        let form = FormUiState::blank(FormKind::FeeNote(FeeEntryId::new(3)));
        let text = render_form_text(&form);
        assert!(text.starts_with("> Note: _"));
    }

    #[test]
    fn matter_card_reveals_client_on_see_more() {
        let view_data = view_data_with_invoices();
        let invoice = &view_data.invoices[0];
        let collapsed = render_matter_card_text(invoice, false);
        assert!(collapsed.contains("Matter: 00101 - Matter 1"));
        assert!(!collapsed.contains("Client:"));
        assert!(collapsed.ends_with("m: see more"));

        let expanded = render_matter_card_text(invoice, true);
        assert!(expanded.contains("Client: Peter Gibbons"));
        assert!(expanded.contains("Billing Method: Hourly"));
    }

    #[test]
    fn placeholder_and_billable_time_labels() {
        assert_eq!(
            placeholder_text(DetailTab::MatterMaintenance),
            "Matter Maintenance content coming soon"
        );
        let mut view_data = view_data_with_invoices();
        view_data.detail.fee_entries = vec![fee_entry(1, "Draft lease"), fee_entry(2, "Call")];
        assert_eq!(billable_time_title(&view_data.detail), "Billable Time (2)");
        view_data.detail.search = "LEASE".to_owned();
        assert_eq!(billable_time_title(&view_data.detail), "Billable Time (1)");
    }
}
