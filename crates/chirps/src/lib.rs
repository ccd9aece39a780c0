//! Chirps domain module.
//!
//! Business rules for short user-authored messages, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod chirp;

pub use chirp::{Chirp, ChirpQuery, MAX_BODY_CHARS, SortOrder, validate_body};
