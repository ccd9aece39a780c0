//! HTTP handlers, one file per area.

pub mod auth;
pub mod chirps;
pub mod polka;
pub mod system;
pub mod users;
