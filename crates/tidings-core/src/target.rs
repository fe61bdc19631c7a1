//! Targets — the objects notifications are about — and the registry that
//! resolves them.
//!
//! Target objects live outside this subsystem and may disappear at any
//! time. An unresolvable target is not an error: the notification still
//! lists, degraded to a placeholder summary.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of object a notification references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
  Post,
  Person,
}

/// Reference to the object a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
  pub kind: TargetKind,
  pub id:   Uuid,
}

impl TargetRef {
  pub fn post(id: Uuid) -> Self {
    Self { kind: TargetKind::Post, id }
  }

  pub fn person(id: Uuid) -> Self {
    Self { kind: TargetKind::Person, id }
  }
}

/// What a renderer needs in order to describe a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSummary {
  pub title:       String,
  pub author_name: Option<String>,
}

/// Outcome of a registry lookup.
#[derive(Debug, Clone)]
pub enum TargetResolution {
  Resolved(TargetSummary),
  /// The target has been deleted (or never existed here).
  Unresolved,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over whatever owns the target objects (posts, people).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait TargetRegistry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn resolve(
    &self,
    target: TargetRef,
  ) -> impl Future<Output = Result<TargetResolution, Self::Error>> + Send + '_;
}
