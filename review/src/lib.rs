//! Log review dashboard engine.
//!
//! Everything here is pure: filter state and its reducer, the predicate that
//! applies it to records, the check tree behind the context picker, table
//! sorting and pagination, CSV export, and the [`Dashboard`] controller that
//! ties them together. Callers (the `cli` crate, the server for its own
//! filtering) own all I/O.

pub mod csv;
pub mod dashboard;
pub mod filters;
pub mod notices;
pub mod pagination;
mod predicate;
pub mod reducer;
pub mod table;
pub mod tree;

#[cfg(test)]
mod test_support;

pub use csv::CsvDownload;
pub use dashboard::{Dashboard, FetchError, FetchOutcome, FetchRequest, FetchTicket, log_columns};
pub use filters::{ActionErrorFilter, AdvancedFilter, DateRange, FilterError, LogFilters};
pub use notices::{Alert, FatalError, Notices};
pub use reducer::{Action, DashboardState, FilterDrawer, reduce};
pub use table::{Column, ColumnType, SortDirection, SortState};
pub use tree::CheckTree;
