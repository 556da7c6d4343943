//! Database models for Tunebridge
//!
//! SQLx row types for the user store:
//! - User accounts
//! - Server-side sessions

pub mod session;
pub mod user;

pub use session::Session;
pub use user::{NewUser, User};
