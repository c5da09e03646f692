//! Log review HTTP service.
//!
//! Serves filtered, paged log records to the review dashboard over
//! `GET /api/admin/logs`, backed by an in-memory or Postgres store.

pub mod config;
pub mod db;
pub mod error;
pub mod params;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
