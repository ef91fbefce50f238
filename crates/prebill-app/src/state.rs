// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, DetailTab, FormKind, InvoiceId, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: View,
    pub mode: AppMode,
    pub detail_tab: DetailTab,
    pub comments_open: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view: View::Landing,
            mode: AppMode::Nav,
            detail_tab: DetailTab::Fees,
            comments_open: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenInvoice(InvoiceId),
    BackToLanding,
    NextTab,
    PrevTab,
    SelectTab(DetailTab),
    OpenFilters,
    OpenForm(FormKind),
    ExitToNav,
    ToggleComments,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ViewChanged(View),
    ModeChanged(AppMode),
    TabChanged(DetailTab),
    CommentsVisibilityChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::OpenInvoice(invoice_id) => {
                self.view = View::Detail(invoice_id);
                self.mode = AppMode::Nav;
                self.detail_tab = DetailTab::Fees;
                self.comments_open = false;
                vec![
                    AppEvent::ViewChanged(self.view),
                    AppEvent::TabChanged(self.detail_tab),
                ]
            }
            AppCommand::BackToLanding => {
                self.view = View::Landing;
                self.mode = AppMode::Nav;
                vec![AppEvent::ViewChanged(self.view)]
            }
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::SelectTab(tab) => {
                if !matches!(self.view, View::Detail(_)) {
                    return Vec::new();
                }
                self.detail_tab = tab;
                vec![AppEvent::TabChanged(tab)]
            }
            AppCommand::OpenFilters => {
                if self.view != View::Landing {
                    return Vec::new();
                }
                self.mode = AppMode::Filters;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenForm(kind) => {
                if !matches!(self.view, View::Detail(_)) {
                    return Vec::new();
                }
                self.mode = AppMode::Form(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleComments => {
                self.comments_open = !self.comments_open;
                let label = if self.comments_open {
                    "comments shown"
                } else {
                    "comments hidden"
                };
                vec![
                    AppEvent::CommentsVisibilityChanged(self.comments_open),
                    self.set_status(label),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        if !matches!(self.view, View::Detail(_)) {
            return Vec::new();
        }
        let tabs = DetailTab::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.detail_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.detail_tab = tabs[next];
        vec![AppEvent::TabChanged(self.detail_tab)]
    }
}
