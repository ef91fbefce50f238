// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterKey {
    Clients,
    Statuses,
    StartDate,
    EndDate,
    AssociateAttorneys,
    ResponsibleAttorneys,
    Billers,
    HoldTypes,
    Keyword,
    IncludeLocked,
    IncludeDeleted,
    OnHoldOnly,
    GroupByClient,
}

impl FilterKey {
    /// Display order of the filter drawer and the chips line.
    pub const ALL: [Self; 13] = [
        Self::Clients,
        Self::Statuses,
        Self::StartDate,
        Self::EndDate,
        Self::AssociateAttorneys,
        Self::ResponsibleAttorneys,
        Self::Billers,
        Self::HoldTypes,
        Self::Keyword,
        Self::IncludeLocked,
        Self::IncludeDeleted,
        Self::OnHoldOnly,
        Self::GroupByClient,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Statuses => "statuses",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::AssociateAttorneys => "associateAttorneys",
            Self::ResponsibleAttorneys => "responsibleAttorneys",
            Self::Billers => "billers",
            Self::HoldTypes => "holdTypes",
            Self::Keyword => "keyword",
            Self::IncludeLocked => "includeLocked",
            Self::IncludeDeleted => "includeDeleted",
            Self::OnHoldOnly => "onHoldOnly",
            Self::GroupByClient => "groupByClient",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == value)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clients => "Client",
            Self::Statuses => "Status",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::AssociateAttorneys => "Associate Attorney",
            Self::ResponsibleAttorneys => "Responsible Attorney",
            Self::Billers => "Biller",
            Self::HoldTypes => "Hold Type",
            Self::Keyword => "Keyword",
            Self::IncludeLocked => "Include Locked",
            Self::IncludeDeleted => "Include Deleted",
            Self::OnHoldOnly => "On Hold Only",
            Self::GroupByClient => "Group by Client",
        }
    }

    /// Keys the result pipeline actually consults. The rest are accepted,
    /// counted and shown as chips, but invoices carry no attribute to match
    /// them against yet.
    pub const fn affects_results(self) -> bool {
        matches!(
            self,
            Self::Clients
                | Self::Statuses
                | Self::StartDate
                | Self::EndDate
                | Self::Keyword
                | Self::GroupByClient
        )
    }

    /// The grouping flag lives alongside the filters so apply/reset govern
    /// it, but it is a view mode rather than a filter chip.
    pub const fn is_view_mode(self) -> bool {
        matches!(self, Self::GroupByClient)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterValues {
    pub clients: Vec<String>,
    pub statuses: Vec<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub keyword: String,
    pub associate_attorneys: Vec<String>,
    pub responsible_attorneys: Vec<String>,
    pub billers: Vec<String>,
    pub hold_types: Vec<String>,
    pub include_locked: bool,
    pub include_deleted: bool,
    pub on_hold_only: bool,
    pub group_by_client: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub key: FilterKey,
    pub label: &'static str,
    pub value: String,
}

impl FilterChip {
    pub fn text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

impl FilterValues {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Grouping is on unless explicitly switched off.
    pub fn grouping_enabled(&self) -> bool {
        self.group_by_client != Some(false)
    }

    pub fn list(&self, key: FilterKey) -> Option<&Vec<String>> {
        match key {
            FilterKey::Clients => Some(&self.clients),
            FilterKey::Statuses => Some(&self.statuses),
            FilterKey::AssociateAttorneys => Some(&self.associate_attorneys),
            FilterKey::ResponsibleAttorneys => Some(&self.responsible_attorneys),
            FilterKey::Billers => Some(&self.billers),
            FilterKey::HoldTypes => Some(&self.hold_types),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, key: FilterKey) -> Option<&mut Vec<String>> {
        match key {
            FilterKey::Clients => Some(&mut self.clients),
            FilterKey::Statuses => Some(&mut self.statuses),
            FilterKey::AssociateAttorneys => Some(&mut self.associate_attorneys),
            FilterKey::ResponsibleAttorneys => Some(&mut self.responsible_attorneys),
            FilterKey::Billers => Some(&mut self.billers),
            FilterKey::HoldTypes => Some(&mut self.hold_types),
            _ => None,
        }
    }

    pub fn flag(&self, key: FilterKey) -> Option<bool> {
        match key {
            FilterKey::IncludeLocked => Some(self.include_locked),
            FilterKey::IncludeDeleted => Some(self.include_deleted),
            FilterKey::OnHoldOnly => Some(self.on_hold_only),
            _ => None,
        }
    }

    pub fn flag_mut(&mut self, key: FilterKey) -> Option<&mut bool> {
        match key {
            FilterKey::IncludeLocked => Some(&mut self.include_locked),
            FilterKey::IncludeDeleted => Some(&mut self.include_deleted),
            FilterKey::OnHoldOnly => Some(&mut self.on_hold_only),
            _ => None,
        }
    }

    /// Adds the value when missing, removes it when present. Selection order
    /// is kept.
    pub fn toggle_selection(&mut self, key: FilterKey, value: &str) -> bool {
        let Some(list) = self.list_mut(key) else {
            return false;
        };
        if let Some(index) = list.iter().position(|existing| existing == value) {
            list.remove(index);
            false
        } else {
            list.push(value.to_owned());
            true
        }
    }

    pub fn is_active(&self, key: FilterKey) -> bool {
        match key {
            FilterKey::StartDate => self.start_date.is_some(),
            FilterKey::EndDate => self.end_date.is_some(),
            FilterKey::Keyword => !self.keyword.is_empty(),
            FilterKey::GroupByClient => self.group_by_client.is_some(),
            key => {
                if let Some(list) = self.list(key) {
                    !list.is_empty()
                } else {
                    self.flag(key).unwrap_or(false)
                }
            }
        }
    }

    /// Badge count on the filter button: each selected element of a
    /// multi-select counts, any other active filter counts once.
    pub fn active_count(&self) -> usize {
        FilterKey::ALL
            .into_iter()
            .filter(|key| !key.is_view_mode())
            .map(|key| match self.list(key) {
                Some(list) => list.len(),
                None => usize::from(self.is_active(key)),
            })
            .sum()
    }

    pub fn chips(&self) -> Vec<FilterChip> {
        FilterKey::ALL
            .into_iter()
            .filter(|key| !key.is_view_mode() && self.is_active(*key))
            .filter_map(|key| {
                self.display_value(key).map(|value| FilterChip {
                    key,
                    label: key.label(),
                    value,
                })
            })
            .collect()
    }

    pub fn display_value(&self, key: FilterKey) -> Option<String> {
        if !self.is_active(key) {
            return None;
        }
        let value = match key {
            FilterKey::StartDate => format_date_input(self.start_date?),
            FilterKey::EndDate => format_date_input(self.end_date?),
            FilterKey::Keyword => self.keyword.clone(),
            FilterKey::GroupByClient => self.group_by_client?.to_string(),
            key => match self.list(key) {
                Some(list) if list.len() == 1 => list[0].clone(),
                Some(list) => format!("{} selected", list.len()),
                None => "true".to_owned(),
            },
        };
        Some(value)
    }

    /// Returns the key to its inactive value.
    pub fn remove(&mut self, key: FilterKey) {
        match key {
            FilterKey::StartDate => self.start_date = None,
            FilterKey::EndDate => self.end_date = None,
            FilterKey::Keyword => self.keyword.clear(),
            FilterKey::GroupByClient => self.group_by_client = None,
            key => {
                if let Some(list) = self.list_mut(key) {
                    list.clear();
                } else if let Some(flag) = self.flag_mut(key) {
                    *flag = false;
                }
            }
        }
    }
}

/// Lenient `YYYY-MM-DD` parse; anything else means "no date".
pub fn parse_date_input(raw: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), &format).ok()
}

pub fn format_date_input(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format).unwrap_or_default()
}

/// Quick ranges offered next to the date fields. Weeks run Monday to Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    LastWeek,
    LastTwoWeeks,
    ThisWeek,
    Last30Days,
    ThisMonth,
}

impl DatePreset {
    pub const ALL: [Self; 5] = [
        Self::LastWeek,
        Self::LastTwoWeeks,
        Self::ThisWeek,
        Self::Last30Days,
        Self::ThisMonth,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::LastWeek => "Last Week",
            Self::LastTwoWeeks => "Last 2 Weeks",
            Self::ThisWeek => "This Week",
            Self::Last30Days => "Last 30 Days",
            Self::ThisMonth => "This Month",
        }
    }

    /// Inclusive `(start, end)` relative to `today`.
    pub fn range(self, today: Date) -> Option<(Date, Date)> {
        let week_start = |day: Date| {
            day.saturating_sub(Duration::days(i64::from(
                day.weekday().number_days_from_monday(),
            )))
        };
        let week_end = |day: Date| week_start(day).saturating_add(Duration::days(6));
        match self {
            Self::LastWeek => {
                let prior = today.saturating_sub(Duration::weeks(1));
                Some((week_start(prior), week_end(prior)))
            }
            Self::LastTwoWeeks => {
                let first = today.saturating_sub(Duration::weeks(2));
                let second = today.saturating_sub(Duration::weeks(1));
                Some((week_start(first), week_end(second)))
            }
            Self::ThisWeek => Some((week_start(today), week_end(today))),
            Self::Last30Days => Some((today.saturating_sub(Duration::days(30)), today)),
            Self::ThisMonth => {
                let start = today.replace_day(1).ok()?;
                let last = time::util::days_in_year_month(today.year(), today.month());
                let end = today.replace_day(last).ok()?;
                Some((start, end))
            }
        }
    }

    /// Writes the range into both date fields.
    pub fn apply_to(self, values: &mut FilterValues, today: Date) -> bool {
        let Some((start, end)) = self.range(today) else {
            return false;
        };
        values.start_date = Some(start);
        values.end_date = Some(end);
        true
    }
}

/// Draft/applied filter pair for one landing session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    initial: FilterValues,
    draft: FilterValues,
    applied: FilterValues,
    revision: u64,
}

impl FilterState {
    pub fn new(initial: FilterValues) -> Self {
        Self {
            draft: initial.clone(),
            applied: initial.clone(),
            initial,
            revision: 0,
        }
    }

    pub fn initial(&self) -> &FilterValues {
        &self.initial
    }

    pub fn draft(&self) -> &FilterValues {
        &self.draft
    }

    pub fn applied(&self) -> &FilterValues {
        &self.applied
    }

    /// Bumped whenever `applied` is written.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_draft(&mut self, values: FilterValues) {
        self.draft = values;
    }

    pub fn update_draft(&mut self, edit: impl FnOnce(&mut FilterValues)) {
        edit(&mut self.draft);
    }

    pub fn set_applied(&mut self, values: FilterValues) {
        self.applied = values;
        self.bump();
    }

    /// Direct-apply path for controls that bypass the drawer.
    pub fn set_both(&mut self, values: FilterValues) {
        self.draft = values.clone();
        self.set_applied(values);
    }

    pub fn apply(&mut self) {
        self.applied = self.draft.clone();
        self.bump();
        tracing::debug!(active = self.applied.active_count(), "filters applied");
    }

    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
    }

    pub fn clear(&mut self) {
        self.draft = FilterValues::default();
        self.applied = FilterValues::default();
        self.bump();
    }

    /// Chip removal: drops one key from the applied filters only.
    pub fn remove_applied(&mut self, key: FilterKey) {
        let mut applied = self.applied.clone();
        applied.remove(key);
        self.set_applied(applied);
    }

    /// Grouping toggle: written to draft and applied together.
    pub fn set_grouping(&mut self, grouped: bool) {
        let mut values = self.applied.clone();
        values.group_by_client = Some(grouped);
        self.set_both(values);
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{DatePreset, FilterKey, FilterState, FilterValues, parse_date_input};
    use time::macros::date;

    fn posted_only() -> FilterValues {
        FilterValues {
            statuses: vec!["Posted".to_owned()],
            ..FilterValues::default()
        }
    }

    #[test]
    fn draft_edits_do_not_leak_into_applied_until_apply() {
        let mut state = FilterState::default();
        state.update_draft(|draft| draft.keyword = "acme".to_owned());
        assert!(state.applied().keyword.is_empty());

        state.apply();
        assert_eq!(state.applied().keyword, "acme");

        state.update_draft(|draft| draft.keyword = "zeta".to_owned());
        assert_eq!(state.applied().keyword, "acme");
    }

    #[test]
    fn reset_after_apply_restores_initial_draft_and_keeps_applied() {
        let initial = posted_only();
        let mut state = FilterState::new(initial.clone());
        state.update_draft(|draft| draft.clients = vec!["Acme".to_owned()]);
        state.apply();
        state.update_draft(|draft| draft.keyword = "late".to_owned());
        let applied_before = state.applied().clone();

        state.reset();
        assert_eq!(state.draft(), &initial);
        assert_eq!(state.applied(), &applied_before);
    }

    #[test]
    fn clear_empties_both_even_after_reset() {
        let mut state = FilterState::new(posted_only());
        state.reset();
        state.clear();
        assert!(state.draft().is_empty());
        assert!(state.applied().is_empty());
    }

    #[test]
    fn set_applied_bypasses_draft() {
        let mut state = FilterState::default();
        state.set_applied(posted_only());
        assert_eq!(state.applied(), &posted_only());
        assert!(state.draft().is_empty());
    }

    #[test]
    fn grouping_toggle_writes_draft_and_applied() {
        let mut state = FilterState::default();
        state.update_draft(|draft| draft.keyword = "staged".to_owned());
        state.set_grouping(false);

        assert!(!state.applied().grouping_enabled());
        assert!(!state.draft().grouping_enabled());
        assert!(state.draft().keyword.is_empty());
    }

    #[test]
    fn revision_tracks_applied_writes_only() {
        let mut state = FilterState::default();
        let start = state.revision();
        state.set_draft(posted_only());
        state.reset();
        assert_eq!(state.revision(), start);
        state.apply();
        assert_eq!(state.revision(), start + 1);
    }

    #[test]
    fn active_count_counts_each_selection() {
        let values = FilterValues {
            clients: vec!["Acme".to_owned(), "Zeta".to_owned()],
            keyword: "merger".to_owned(),
            include_locked: true,
            group_by_client: Some(false),
            ..FilterValues::default()
        };
        assert_eq!(values.active_count(), 4);
    }

    #[test]
    fn empty_values_are_inactive() {
        let values = FilterValues {
            clients: Vec::new(),
            keyword: String::new(),
            ..FilterValues::default()
        };
        assert_eq!(values.active_count(), 0);
        assert!(values.chips().is_empty());
    }

    #[test]
    fn chips_summarize_multi_selections() {
        let values = FilterValues {
            clients: vec!["Acme".to_owned()],
            statuses: vec!["Posted".to_owned(), "Paid".to_owned()],
            start_date: Some(date!(2026 - 01 - 01)),
            ..FilterValues::default()
        };
        let chips: Vec<String> = values.chips().iter().map(|chip| chip.text()).collect();
        assert_eq!(
            chips,
            vec![
                "Client: Acme".to_owned(),
                "Status: 2 selected".to_owned(),
                "Start Date: 2026-01-01".to_owned(),
            ]
        );
    }

    #[test]
    fn remove_applied_leaves_draft_alone() {
        let mut state = FilterState::default();
        state.set_draft(posted_only());
        state.apply();
        state.remove_applied(FilterKey::Statuses);
        assert!(state.applied().statuses.is_empty());
        assert_eq!(state.draft(), &posted_only());
    }

    #[test]
    fn toggle_selection_adds_then_removes() {
        let mut values = FilterValues::default();
        assert!(values.toggle_selection(FilterKey::Clients, "Acme"));
        assert_eq!(values.clients, vec!["Acme".to_owned()]);
        assert!(!values.toggle_selection(FilterKey::Clients, "Acme"));
        assert!(values.clients.is_empty());
        assert!(!values.toggle_selection(FilterKey::Keyword, "ignored"));
    }

    #[test]
    fn date_input_is_lenient() {
        assert_eq!(parse_date_input("2026-01-26"), Some(date!(2026 - 01 - 26)));
        assert_eq!(parse_date_input(" 2026-01-26 "), Some(date!(2026 - 01 - 26)));
        assert_eq!(parse_date_input("01/26/2026"), None);
        assert_eq!(parse_date_input("2026-02-30"), None);
    }

    #[test]
    fn filter_keys_round_trip() {
        for key in FilterKey::ALL {
            assert_eq!(FilterKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn date_presets_anchor_on_monday_weeks() {
        // 2026-01-28 is a Wednesday.
        let today = date!(2026 - 01 - 28);
        assert_eq!(
            DatePreset::ThisWeek.range(today),
            Some((date!(2026 - 01 - 26), date!(2026 - 02 - 01)))
        );
        assert_eq!(
            DatePreset::LastWeek.range(today),
            Some((date!(2026 - 01 - 19), date!(2026 - 01 - 25)))
        );
        assert_eq!(
            DatePreset::LastTwoWeeks.range(today),
            Some((date!(2026 - 01 - 12), date!(2026 - 01 - 25)))
        );
        assert_eq!(
            DatePreset::ThisMonth.range(date!(2024 - 02 - 10)),
            Some((date!(2024 - 02 - 01), date!(2024 - 02 - 29)))
        );

        let mut values = FilterValues::default();
        assert!(DatePreset::Last30Days.apply_to(&mut values, today));
        assert_eq!(values.start_date, Some(date!(2025 - 12 - 29)));
        assert_eq!(values.end_date, Some(today));
    }
}
