//! Roster Backend Library
//!
//! Student-records service: JWT-authenticated REST API over SQLite plus a
//! dashboard client library. Exposed as a library so the `rosterd` binary
//! and the integration tests share the same router and stores.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod server;
pub mod students;
