//! Database repository layer for Tunebridge
//!
//! Centralizes the user-store queries so services and extractors share one
//! set of SQL statements.

pub mod session;
pub mod user;

pub use session::SessionRepository;
pub use user::UserRepository;
