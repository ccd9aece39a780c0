//! HTTP API: server, routing, and request/response mapping.
//!
//! A thin adapter over `chirpy-infra`: it decodes requests, pulls the
//! `Authorization` header, and maps `DomainError` kinds to status codes.

pub mod app;
pub mod context;
pub mod middleware;
