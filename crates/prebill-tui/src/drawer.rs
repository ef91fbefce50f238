// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{InternalEvent, ViewData, emit_status, refresh_landing};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prebill_app::{
    AppCommand, AppState, DatePreset, FilterKey, FilterValues, format_date_input, parse_date_input,
};
use std::collections::BTreeSet;
use std::sync::mpsc::Sender;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DrawerItem {
    Field(FilterKey),
    Apply,
    Reset,
    Clear,
}

/// Drawer cursor state. The drawer itself is visible while the app is in
/// filters mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DrawerUiState {
    pub(crate) cursor: usize,
    pub(crate) option_cursor: usize,
    pub(crate) editing: Option<String>,
    pub(crate) preset_cursor: usize,
}

pub(crate) fn drawer_items() -> Vec<DrawerItem> {
    FilterKey::ALL
        .into_iter()
        .filter(|key| !key.is_view_mode())
        .map(DrawerItem::Field)
        .chain([DrawerItem::Apply, DrawerItem::Reset, DrawerItem::Clear])
        .collect()
}

fn field_label(key: FilterKey) -> &'static str {
    match key {
        FilterKey::IncludeLocked => "Include Locked Invoices",
        FilterKey::IncludeDeleted => "Include Deleted Invoices",
        FilterKey::OnHoldOnly => "On Hold Bills Only",
        other => other.label(),
    }
}

fn is_text_field(key: FilterKey) -> bool {
    matches!(
        key,
        FilterKey::StartDate | FilterKey::EndDate | FilterKey::Keyword
    )
}

/// Choices for a multi-select, in first-seen order. Only clients and
/// statuses are backed by invoice data.
pub(crate) fn filter_options(view_data: &ViewData, key: FilterKey) -> Vec<String> {
    let mut seen = BTreeSet::new();
    view_data
        .invoices
        .iter()
        .filter_map(|invoice| match key {
            FilterKey::Clients => Some(invoice.client_name().to_owned()),
            FilterKey::Statuses => Some(invoice.status.as_str().to_owned()),
            _ => None,
        })
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

fn current_item(view_data: &ViewData) -> Option<DrawerItem> {
    drawer_items().get(view_data.drawer.cursor).copied()
}

pub(crate) fn open_drawer(state: &mut AppState, view_data: &mut ViewData) {
    state.dispatch(AppCommand::OpenFilters);
    view_data.drawer.editing = None;
    view_data.drawer.option_cursor = 0;
}

fn close_drawer(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    view_data.drawer.editing = None;
    state.dispatch(AppCommand::ExitToNav);
    emit_status(state, view_data, internal_tx, message);
}

pub(crate) fn handle_drawer_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.drawer.editing.is_some() {
        handle_text_edit_key(state, view_data, internal_tx, key);
        return;
    }

    let Some(item) = current_item(view_data) else {
        view_data.drawer.cursor = 0;
        return;
    };

    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            close_drawer(state, view_data, internal_tx, "filters closed; draft kept");
        }
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) | (KeyCode::Tab, _) => {
            move_cursor(view_data, 1);
        }
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) | (KeyCode::BackTab, _) => {
            move_cursor(view_data, -1);
        }
        (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => {
            move_option(view_data, item, -1);
        }
        (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => {
            move_option(view_data, item, 1);
        }
        (KeyCode::Char('p'), KeyModifiers::NONE) => {
            let today = OffsetDateTime::now_utc().date();
            let status = cycle_date_preset(view_data, item, today);
            emit_status(state, view_data, internal_tx, status);
        }
        (KeyCode::Char('a'), KeyModifiers::NONE) => {
            activate(state, view_data, internal_tx, DrawerItem::Apply);
        }
        (KeyCode::Char(' '), _) | (KeyCode::Enter, _) => {
            activate(state, view_data, internal_tx, item);
        }
        _ => {}
    }
}

fn move_cursor(view_data: &mut ViewData, delta: isize) {
    let len = drawer_items().len() as isize;
    let next = (view_data.drawer.cursor as isize + delta).rem_euclid(len) as usize;
    view_data.drawer.cursor = next;
    view_data.drawer.option_cursor = 0;
}

fn move_option(view_data: &mut ViewData, item: DrawerItem, delta: isize) {
    let DrawerItem::Field(key) = item else {
        return;
    };
    let options = filter_options(view_data, key);
    if options.is_empty() {
        return;
    }
    let len = options.len() as isize;
    let next = (view_data.drawer.option_cursor as isize + delta).rem_euclid(len) as usize;
    view_data.drawer.option_cursor = next;
}

fn activate(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    item: DrawerItem,
) {
    match item {
        DrawerItem::Apply => {
            view_data.landing.filters.apply();
            refresh_landing(view_data);
            let active = view_data.landing.filters.applied().active_count();
            close_drawer(
                state,
                view_data,
                internal_tx,
                format!("filters applied ({active} active)"),
            );
        }
        DrawerItem::Reset => {
            view_data.landing.filters.reset();
            emit_status(state, view_data, internal_tx, "draft reset");
        }
        DrawerItem::Clear => {
            view_data.landing.filters.clear();
            refresh_landing(view_data);
            emit_status(state, view_data, internal_tx, "filters cleared");
        }
        DrawerItem::Field(key) if is_text_field(key) => {
            let current = view_data
                .landing
                .filters
                .draft()
                .display_value(key)
                .unwrap_or_default();
            view_data.drawer.editing = Some(current);
        }
        DrawerItem::Field(key) => {
            let status = toggle_field(view_data, key);
            emit_status(state, view_data, internal_tx, status);
        }
    }
}

fn toggle_field(view_data: &mut ViewData, key: FilterKey) -> String {
    let label = field_label(key);
    if view_data.landing.filters.draft().flag(key).is_some() {
        let mut enabled = false;
        view_data.landing.filters.update_draft(|draft| {
            if let Some(flag) = draft.flag_mut(key) {
                *flag = !*flag;
                enabled = *flag;
            }
        });
        return format!("{label}: {}", if enabled { "on" } else { "off" });
    }

    let options = filter_options(view_data, key);
    let Some(value) = options
        .get(view_data.drawer.option_cursor.min(options.len().saturating_sub(1)))
        .cloned()
    else {
        return format!("no {label} options available");
    };
    let mut selected = false;
    view_data.landing.filters.update_draft(|draft| {
        selected = draft.toggle_selection(key, &value);
    });
    format!(
        "{label}: {value} {}",
        if selected { "selected" } else { "removed" }
    )
}

fn handle_text_edit_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(DrawerItem::Field(filter_key)) = current_item(view_data) else {
        view_data.drawer.editing = None;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            view_data.drawer.editing = None;
            emit_status(state, view_data, internal_tx, "edit canceled");
        }
        KeyCode::Enter => {
            let buffer = view_data.drawer.editing.take().unwrap_or_default();
            if let Err(message) = commit_text(view_data, filter_key, &buffer) {
                view_data.drawer.editing = Some(buffer);
                emit_status(state, view_data, internal_tx, message);
            }
        }
        KeyCode::Backspace => {
            if let Some(buffer) = view_data.drawer.editing.as_mut() {
                buffer.pop();
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(buffer) = view_data.drawer.editing.as_mut() {
                buffer.push(ch);
            }
        }
        _ => {}
    }
}

fn commit_text(view_data: &mut ViewData, key: FilterKey, buffer: &str) -> Result<(), String> {
    let filters = &mut view_data.landing.filters;
    match key {
        FilterKey::Keyword => {
            let keyword = buffer.to_owned();
            filters.update_draft(|draft| draft.keyword = keyword);
            Ok(())
        }
        FilterKey::StartDate | FilterKey::EndDate => {
            let date = if buffer.trim().is_empty() {
                None
            } else {
                Some(parse_date_input(buffer).ok_or_else(|| {
                    format!("{} must be YYYY-MM-DD, e.g. 2026-01-31", field_label(key))
                })?)
            };
            filters.update_draft(|draft| set_date(draft, key, date));
            Ok(())
        }
        _ => Ok(()),
    }
}

fn set_date(draft: &mut FilterValues, key: FilterKey, date: Option<Date>) {
    match key {
        FilterKey::StartDate => draft.start_date = date,
        FilterKey::EndDate => draft.end_date = date,
        _ => {}
    }
}

fn cycle_date_preset(view_data: &mut ViewData, item: DrawerItem, today: Date) -> String {
    if !matches!(
        item,
        DrawerItem::Field(FilterKey::StartDate | FilterKey::EndDate)
    ) {
        return "presets apply to the date fields".to_owned();
    }
    let preset = DatePreset::ALL[view_data.drawer.preset_cursor % DatePreset::ALL.len()];
    view_data.drawer.preset_cursor = view_data.drawer.preset_cursor.wrapping_add(1);

    let mut applied = false;
    view_data
        .landing
        .filters
        .update_draft(|draft| applied = preset.apply_to(draft, today));
    let draft = view_data.landing.filters.draft();
    match (applied, draft.start_date, draft.end_date) {
        (true, Some(start), Some(end)) => format!(
            "{}: {} to {}",
            preset.label(),
            format_date_input(start),
            format_date_input(end)
        ),
        _ => format!("{} unavailable for {today}", preset.label()),
    }
}

pub(crate) fn render_drawer_text(view_data: &ViewData) -> String {
    let draft = view_data.landing.filters.draft();
    let drawer = &view_data.drawer;
    let mut lines = Vec::new();

    for (index, item) in drawer_items().into_iter().enumerate() {
        let focused = index == drawer.cursor;
        let pointer = if focused { ">" } else { " " };
        let line = match item {
            DrawerItem::Field(key) if is_text_field(key) => {
                let value = match (&drawer.editing, focused) {
                    (Some(buffer), true) => format!("{buffer}_"),
                    _ => draft.display_value(key).unwrap_or_else(|| "-".to_owned()),
                };
                let hint = match key {
                    FilterKey::StartDate | FilterKey::EndDate if focused => "  (p preset)",
                    _ => "",
                };
                format!("{pointer} {}: {value}{hint}", field_label(key))
            }
            DrawerItem::Field(key) => match draft.flag(key) {
                Some(enabled) => {
                    let mark = if enabled { "x" } else { " " };
                    format!("{pointer} [{mark}] {}", field_label(key))
                }
                None => format!(
                    "{pointer} {}: {}",
                    field_label(key),
                    multi_select_text(view_data, key, focused)
                ),
            },
            DrawerItem::Apply => format!("{pointer} [Apply]"),
            DrawerItem::Reset => format!("{pointer} [Reset]"),
            DrawerItem::Clear => format!("{pointer} [Clear]"),
        };
        lines.push(line);
    }

    lines.push(String::new());
    lines.push(format!(
        "pending: {} active | applied: {} active",
        draft.active_count(),
        view_data.landing.filters.applied().active_count()
    ));
    lines.join("\n")
}

fn multi_select_text(view_data: &ViewData, key: FilterKey, focused: bool) -> String {
    let draft = view_data.landing.filters.draft();
    let selected = draft.list(key).cloned().unwrap_or_default();
    let options = filter_options(view_data, key);
    if options.is_empty() {
        return match draft.display_value(key) {
            Some(value) => value,
            None => "(no options)".to_owned(),
        };
    }

    options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let mark = if selected.contains(option) { "x" } else { " " };
            let cell = format!("[{mark}] {option}");
            if focused && index == view_data.drawer.option_cursor {
                format!("<{cell}>")
            } else {
                cell
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}
