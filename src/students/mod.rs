//! Students Module
//! Mission: per-user student roster CRUD, scoped to the authenticated owner

pub mod api;
pub mod models;
pub mod store;

pub use api::StudentState;
pub use store::StudentStore;
