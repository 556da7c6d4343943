//! Middleware components for Tunebridge API
//!
//! - `SessionUser`: requires a valid session cookie, returns 401 otherwise

pub mod session;

pub use session::{SessionRejection, SessionUser};
