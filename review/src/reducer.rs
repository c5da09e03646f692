//! Dashboard state and its reducer.
//!
//! DESIGN
//! ======
//! `reduce` is a pure `(state, action) -> state` function. Every action
//! touches exactly one sub-filter, resets all of them, or changes UI-only
//! state (drawer, loading flag, page). Resets restore the filter value
//! captured when the dashboard was created.

use std::collections::BTreeMap;

use logs::{Log, LogPage};

use crate::filters::{ActionErrorFilter, AdvancedFilter, DateRange, LogFilters};
use crate::pagination::clamp_page;
use crate::tree::CheckTree;

/// Which filter editor is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterDrawer {
    Date,
    Context,
    Tag,
    ActionError,
    Advanced,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    pub filters: LogFilters,
    /// Snapshot restored by [`Action::ResetFilters`].
    pub initial_filters: LogFilters,
    pub drawer: Option<FilterDrawer>,
    pub loading: bool,
    /// 1-indexed; always within `1..=num_pages`.
    pub page_number: u32,
    pub num_pages: u32,
    pub has_another_page: bool,
    /// Records of the current page.
    pub logs: Vec<Log>,
}

impl DashboardState {
    #[must_use]
    pub fn new(filters: LogFilters) -> Self {
        Self {
            initial_filters: filters.clone(),
            filters,
            drawer: None,
            loading: false,
            page_number: 1,
            num_pages: 1,
            has_another_page: false,
            logs: Vec::new(),
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(LogFilters::default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    ShowDrawer(FilterDrawer),
    HideDrawer,
    UpdateDate(Option<DateRange>),
    UpdateContext(CheckTree),
    UpdateTags(BTreeMap<String, bool>),
    UpdateActionError(ActionErrorFilter),
    UpdateAdvanced(AdvancedFilter),
    ResetFilters,
    StartLoading,
    StopLoading,
    /// A fetched page arrived for `page_number`.
    ApplyPage { page_number: u32, page: LogPage },
    SetPageNumber(u32),
}

#[must_use]
pub fn reduce(state: DashboardState, action: Action) -> DashboardState {
    match action {
        Action::ShowDrawer(drawer) => DashboardState { drawer: Some(drawer), ..state },
        Action::HideDrawer => DashboardState { drawer: None, ..state },
        Action::UpdateDate(date) => with_filters(state, |f| LogFilters { date, ..f }),
        Action::UpdateContext(context) => with_filters(state, |f| LogFilters { context, ..f }),
        Action::UpdateTags(tags) => with_filters(state, |f| LogFilters { tags, ..f }),
        Action::UpdateActionError(action_error) => with_filters(state, |f| LogFilters { action_error, ..f }),
        Action::UpdateAdvanced(advanced) => with_filters(state, |f| LogFilters { advanced, ..f }),
        Action::ResetFilters => DashboardState { filters: state.initial_filters.clone(), ..state },
        Action::StartLoading => DashboardState { loading: true, ..state },
        Action::StopLoading => DashboardState { loading: false, ..state },
        Action::ApplyPage { page_number, page } => apply_page(state, page_number, page),
        Action::SetPageNumber(page_number) => DashboardState {
            page_number: clamp_page(page_number, state.num_pages),
            ..state
        },
    }
}

fn with_filters(mut state: DashboardState, update: impl FnOnce(LogFilters) -> LogFilters) -> DashboardState {
    state.filters = update(std::mem::take(&mut state.filters));
    state
}

fn apply_page(state: DashboardState, page_number: u32, page: LogPage) -> DashboardState {
    let page_number = page_number.max(1);
    let num_pages = match page.num_pages {
        Some(counted) => counted.max(1),
        None if page.has_another_page => state.num_pages.max(page_number + 1),
        // An empty page past the known end says nothing about the total.
        None if page.items.is_empty() && page_number > state.num_pages => state.num_pages,
        None => page_number,
    };
    DashboardState {
        loading: false,
        page_number: clamp_page(page_number, num_pages),
        num_pages,
        has_another_page: page.has_another_page,
        logs: page.items,
        ..state
    }
}

#[cfg(test)]
#[path = "reducer_test.rs"]
mod tests;
