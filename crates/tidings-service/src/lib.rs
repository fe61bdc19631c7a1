//! Notification service and read-time aggregation for Tidings.
//!
//! Sits between a [`tidings_core::store::NotificationStore`] backend and a
//! transport layer. Every operation takes the acting recipient explicitly;
//! there is no ambient "current user".

pub mod aggregate;
pub mod service;
pub mod timeago;

pub use aggregate::{DisplayNotification, TargetDisplay, aggregate};
pub use service::{ListRequest, NotificationService, UnreadCounts};
pub use tidings_core::{Error, Result};
