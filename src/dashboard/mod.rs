//! Dashboard Client Module
//! Mission: a typed client for the roster API plus the list view model
//!
//! Session state lives behind an injectable store abstraction instead of
//! global mutable state, so tests and embedders can supply their own.

pub mod client;
pub mod session;
pub mod view;

pub use client::{ClientError, DashboardClient};
pub use session::{MemorySessionStore, Session, SessionStore};
pub use view::{RosterView, PAGE_SIZE};
