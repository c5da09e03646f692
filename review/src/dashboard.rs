//! Sans-IO dashboard controller.
//!
//! DESIGN
//! ======
//! `Dashboard` glues the reducer, the table and the notices together and
//! never performs I/O itself. Anything that needs data returns a
//! [`FetchRequest`]; the caller performs it and hands the outcome back to
//! [`Dashboard::complete_fetch`] with the request's ticket.
//!
//! Tickets are handed out in increasing order and only the most recent one
//! is accepted, so a slow response to a superseded filter never overwrites
//! the newer page (last request wins).
//!
//! Once the server reports `SESSION_EXPIRED` the dashboard refuses to issue
//! further requests.

use logs::wire::codes;
use logs::{DateParts, Failure, LogMetadata, LogPage, LogQuery, LogScope};
use serde_json::Value;

use crate::csv::{CsvDownload, csv_filename, to_csv};
use crate::filters::{ActionErrorFilter, AdvancedFilter, DateRange, LogFilters};
use crate::notices::Notices;
use crate::pagination::{PageButton, clamp_page, page_buttons};
use crate::reducer::{Action, DashboardState, FilterDrawer, reduce};
use crate::table::{Column, ColumnType, ColumnVisibility, SortState, sort_rows};
use crate::tree::CheckTree;

// =============================================================================
// FETCH PROTOCOL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// No response at all.
    #[error("network failure: {0}")]
    Network(String),
    #[error("{message} (code {code})")]
    Server { message: String, code: String },
    #[error("session expired")]
    SessionExpired,
}

impl From<Failure> for FetchError {
    fn from(failure: Failure) -> Self {
        if failure.code == codes::SESSION_EXPIRED {
            Self::SessionExpired
        } else {
            Self::Server { message: failure.message, code: failure.code }
        }
    }
}

pub type FetchOutcome = Result<LogPage, FetchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// A page request the caller should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub scope: LogScope,
    pub query: LogQuery,
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone)]
pub struct Dashboard {
    title: String,
    scope: LogScope,
    columns: Vec<Column>,
    state: DashboardState,
    sort: SortState,
    visibility: ColumnVisibility,
    notices: Notices,
    next_ticket: u64,
    /// Whether `state.num_pages` came from a server count for the current
    /// filters.
    page_count_known: bool,
    /// Latest outstanding request and the page it asked for.
    pending: Option<(FetchTicket, u32)>,
}

impl Dashboard {
    /// A dashboard over `scope`, filtered to the current month up to `today`.
    /// A blank title falls back to the CSV default.
    #[must_use]
    pub fn new(
        title: &str,
        columns: Vec<Column>,
        metadata: &LogMetadata,
        today: DateParts,
        scope: LogScope,
    ) -> Self {
        Self::with_filters(title, columns, LogFilters::initial(metadata, today), scope)
    }

    /// Like [`Dashboard::new`] but starting from (and resetting to) `filters`.
    #[must_use]
    pub fn with_filters(title: &str, columns: Vec<Column>, filters: LogFilters, scope: LogScope) -> Self {
        let title = title.trim();
        Self {
            title: if title.is_empty() { crate::csv::DEFAULT_TITLE.to_owned() } else { title.to_owned() },
            scope,
            visibility: ColumnVisibility::new(&columns),
            columns,
            state: DashboardState::new(filters),
            sort: SortState::default(),
            notices: Notices::default(),
            next_ticket: 0,
            page_count_known: false,
            pending: None,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rename the dashboard. A blank title raises an alert and is ignored.
    pub fn set_title(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            self.notices.show_alert("Invalid title", "The dashboard title cannot be empty.");
            return false;
        }
        title.clone_into(&mut self.title);
        true
    }

    #[must_use]
    pub fn scope(&self) -> LogScope {
        self.scope
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub fn filters(&self) -> &LogFilters {
        &self.state.filters
    }

    #[must_use]
    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Run one reducer step.
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(std::mem::take(&mut self.state), action);
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Ask for `page_number`. The request also asks the server to count
    /// pages on page 1, where every new filter starts, and whenever no count
    /// is known yet. A known count clamps the page.
    ///
    /// Returns `None` once the session has expired.
    pub fn request_page(&mut self, page_number: u32) -> Option<FetchRequest> {
        if self.notices.is_blocked() {
            return None;
        }
        let page_number = if self.page_count_known {
            clamp_page(page_number, self.state.num_pages)
        } else {
            page_number.max(1)
        };
        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        self.pending = Some((ticket, page_number));
        self.dispatch(Action::StartLoading);
        Some(FetchRequest {
            ticket,
            scope: self.scope,
            query: LogQuery {
                page_number,
                filters: Some(self.state.filters.to_json()),
                count_documents: (page_number == 1 || !self.page_count_known).then_some(true),
            },
        })
    }

    /// Re-request the current page.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        self.request_page(self.state.page_number)
    }

    /// Move to `page_number`, clamped to the known page range.
    pub fn go_to_page(&mut self, page_number: u32) -> Option<FetchRequest> {
        self.dispatch(Action::SetPageNumber(page_number));
        self.request_page(self.state.page_number)
    }

    /// Hand back the outcome of a request. Outcomes for superseded tickets
    /// are dropped; returns whether this one was applied.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> bool {
        let Some((pending, page_number)) = self.pending else {
            return false;
        };
        if pending != ticket {
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(page) => {
                self.page_count_known |= page.num_pages.is_some();
                self.notices.dismiss_fatal();
                self.dispatch(Action::ApplyPage { page_number, page });
            }
            Err(err) => {
                self.dispatch(Action::StopLoading);
                match err {
                    FetchError::Network(message) => self.notices.show_fatal(message, codes::NETWORK_FAILURE),
                    FetchError::Server { message, code } => self.notices.show_fatal(message, code),
                    FetchError::SessionExpired => self.notices.expire_session(),
                }
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    pub fn show_drawer(&mut self, drawer: FilterDrawer) {
        self.dispatch(Action::ShowDrawer(drawer));
    }

    pub fn hide_drawer(&mut self) {
        self.dispatch(Action::HideDrawer);
    }

    /// Replace the date range. An invalid range raises an alert and leaves the
    /// filters untouched.
    pub fn set_date_range(&mut self, date: Option<DateRange>) -> Option<FetchRequest> {
        if let Some(range) = &date
            && let Err(err) = range.validate()
        {
            self.notices.show_alert("Invalid date range", err.to_string());
            return None;
        }
        self.update_filters(Action::UpdateDate(date))
    }

    pub fn set_context(&mut self, context: CheckTree) -> Option<FetchRequest> {
        self.update_filters(Action::UpdateContext(context))
    }

    /// Flip one node of the context tree, e.g. `["Quiz", "Attempt"]`.
    pub fn toggle_context(&mut self, path: &[&str]) -> Option<FetchRequest> {
        let context = self.state.filters.context.toggled(path);
        self.set_context(context)
    }

    pub fn set_tags(&mut self, tags: std::collections::BTreeMap<String, bool>) -> Option<FetchRequest> {
        self.update_filters(Action::UpdateTags(tags))
    }

    pub fn set_action_error(&mut self, filter: ActionErrorFilter) -> Option<FetchRequest> {
        self.update_filters(Action::UpdateActionError(filter))
    }

    pub fn set_advanced(&mut self, filter: AdvancedFilter) -> Option<FetchRequest> {
        self.update_filters(Action::UpdateAdvanced(filter))
    }

    pub fn reset_filters(&mut self) -> Option<FetchRequest> {
        self.update_filters(Action::ResetFilters)
    }

    fn update_filters(&mut self, action: Action) -> Option<FetchRequest> {
        self.dispatch(action);
        self.page_count_known = false;
        self.dispatch(Action::SetPageNumber(1));
        self.request_page(1)
    }

    // -------------------------------------------------------------------------
    // Table
    // -------------------------------------------------------------------------

    pub fn click_sort(&mut self, param: &str) {
        self.sort.click(param);
    }

    pub fn toggle_column(&mut self, param: &str) {
        self.visibility.toggle(param);
    }

    #[must_use]
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.visibility.visible(&self.columns)
    }

    /// Current page as JSON rows: filtered, then sorted.
    #[must_use]
    pub fn rows(&self) -> Vec<Value> {
        let rows = self
            .state
            .filters
            .apply(&self.state.logs)
            .into_iter()
            .filter_map(|log| serde_json::to_value(log).ok())
            .collect::<Vec<_>>();
        sort_rows(&rows, &self.columns, &self.sort)
    }

    #[must_use]
    pub fn page_buttons(&self) -> Vec<PageButton> {
        page_buttons(self.state.page_number, self.state.num_pages)
    }

    /// The visible columns of [`Dashboard::rows`] as CSV.
    #[must_use]
    pub fn export_csv(&self) -> CsvDownload {
        CsvDownload {
            filename: csv_filename(&self.title),
            contents: to_csv(&self.visible_columns(), &self.rows()),
        }
    }
}

/// Column schema for log records.
#[must_use]
pub fn log_columns() -> Vec<Column> {
    vec![
        Column::new("Time", "timestamp", ColumnType::Int).hidden(),
        Column::new("Year", "year", ColumnType::Int),
        Column::new("Month", "month", ColumnType::Int),
        Column::new("Day", "day", ColumnType::Int),
        Column::new("Hour", "hour", ColumnType::Int),
        Column::new("Minute", "minute", ColumnType::Int),
        Column::new("Type", "type", ColumnType::String),
        Column::new("Level", "level", ColumnType::String),
        Column::new("Context", "context", ColumnType::String),
        Column::new("Subcontext", "subcontext", ColumnType::String),
        Column::new("Tags", "tags", ColumnType::Json),
        Column::new("Action", "action", ColumnType::String),
        Column::new("Target", "target", ColumnType::String),
        Column::new("Error Message", "errorMessage", ColumnType::String),
        Column::new("Error Code", "errorCode", ColumnType::String),
        Column::new("Error Stack", "errorStack", ColumnType::String).hidden(),
        Column::new("User Id", "userId", ColumnType::Int),
        Column::new("First Name", "userFirstName", ColumnType::String),
        Column::new("Last Name", "userLastName", ColumnType::String),
        Column::new("Email", "userEmail", ColumnType::String),
        Column::new("Learner", "isLearner", ColumnType::Boolean).hidden(),
        Column::new("TTM", "isTTM", ColumnType::Boolean).hidden(),
        Column::new("Admin", "isAdmin", ColumnType::Boolean).hidden(),
        Column::new("Course Id", "courseId", ColumnType::Int).hidden(),
        Column::new("Course Name", "courseName", ColumnType::String),
        Column::new("Device", "device.description", ColumnType::String).hidden(),
        Column::new("Mobile", "device.isMobile", ColumnType::Boolean).hidden(),
        Column::new("Source", "source", ColumnType::String),
        Column::new("Route Path", "routePath", ColumnType::String).hidden(),
        Column::new("Route Template", "routeTemplate", ColumnType::String).hidden(),
        Column::new("Metadata", "metadata", ColumnType::Json).hidden(),
        Column::new("Id", "id", ColumnType::String).hidden(),
    ]
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
