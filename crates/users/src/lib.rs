//! Users domain module.
//!
//! Business rules for accounts, implemented as plain data + pure functions
//! (no IO, no HTTP, no storage, no hashing).

pub mod user;

pub use user::{User, UserView, ensure_email_available, find_by_email, validate_credentials};
