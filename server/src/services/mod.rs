//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the query logic so route handlers can stay focused
//! on parameter coercion, auth and envelopes.

pub mod logs;
