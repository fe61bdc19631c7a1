//! SQLite backend for the Tidings notification store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime.

mod encode;
mod registry;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use registry::SqliteTargetRegistry;
pub use store::SqliteStore;
