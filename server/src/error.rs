//! Stable error codes for typed server errors.

/// Grepable error code carried in failure envelopes.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}
