//! Middleware for observability.
//!
//! Request logging with latency tracking; authentication middleware lives
//! in `auth::middleware`.

pub mod logging;

pub use logging::request_logging;
