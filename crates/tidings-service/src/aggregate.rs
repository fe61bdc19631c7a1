//! Read-time aggregation: fold a page of notifications into display units.
//!
//! Merging happens only within the page it is given; the aggregator never
//! reaches across pages and never writes anything back to the store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use tidings_core::{
  Error, Result,
  kind::NotificationKind,
  notification::{Actor, Notification},
  target::{TargetRef, TargetRegistry, TargetResolution},
};

use crate::timeago::relative_time;

// ─── Output types ────────────────────────────────────────────────────────────

/// Target description carried by a display record. A deleted target degrades
/// to `Missing` instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TargetDisplay {
  Present {
    title:       String,
    author_name: Option<String>,
  },
  Missing,
}

/// One presentable unit: a notification row, possibly display-merged with
/// sibling rows referencing the same target.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayNotification {
  /// Id of the primary (most recently updated) merged row.
  pub id:           Uuid,
  pub kind:         NotificationKind,
  pub actors:       Vec<Actor>,
  pub unread:       bool,
  /// RFC 3339 when serialised; renderers attach it as the machine-readable
  /// timestamp next to the human label.
  pub updated_at:   DateTime<Utc>,
  /// Human relative-time label ("3 hours ago").
  pub time_ago:     String,
  /// Rendered note label ("Bob and 2 others also commented on a post").
  pub note:         String,
  pub target:       TargetDisplay,
  /// True when sibling rows were merged into this unit.
  pub combined:     bool,
  /// Whether the rendering layer may offer contact-list actions.
  pub contact_menu: bool,
  /// Ids of every merged row, primary first.
  pub source_ids:   Vec<Uuid>,
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Rows collapsing into one display unit share a key. Combinable kinds merge
/// per target; everything else stands alone.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DisplayKey {
  Group(TargetRef, &'static str),
  Single(Uuid),
}

fn display_key(notification: &Notification) -> DisplayKey {
  match notification.kind.combine_group() {
    Some(group) => DisplayKey::Group(notification.target, group),
    None => DisplayKey::Single(notification.id),
  }
}

/// Fold one page of notifications (already filtered, paginated, and sorted
/// most-recent-first) into display units.
///
/// The first row seen for a display key is primary: its metadata wins and
/// its position in the page is kept. Later rows for the same key contribute
/// their unseen actors and their id.
pub async fn aggregate<R>(
  page:     &[Notification],
  registry: &R,
  now:      DateTime<Utc>,
) -> Result<Vec<DisplayNotification>>
where
  R: TargetRegistry,
{
  let mut units: Vec<DisplayNotification> = Vec::with_capacity(page.len());
  let mut slots: HashMap<DisplayKey, usize> = HashMap::new();

  for notification in page {
    let key = display_key(notification);

    if let Some(&slot) = slots.get(&key) {
      let unit = &mut units[slot];
      unit.combined = true;
      unit.source_ids.push(notification.id);
      for actor in &notification.actors {
        if !unit.actors.iter().any(|a| a.id == actor.id) {
          unit.actors.push(actor.clone());
        }
      }
      continue;
    }

    let target = match registry
      .resolve(notification.target)
      .await
      .map_err(|e| Error::Unavailable(Box::new(e)))?
    {
      TargetResolution::Resolved(summary) => TargetDisplay::Present {
        title:       summary.title,
        author_name: summary.author_name,
      },
      TargetResolution::Unresolved => TargetDisplay::Missing,
    };

    slots.insert(key, units.len());
    units.push(DisplayNotification {
      id:           notification.id,
      kind:         notification.kind,
      actors:       notification.actors.clone(),
      unread:       notification.unread,
      updated_at:   notification.updated_at,
      time_ago:     relative_time(notification.updated_at, now),
      note:         String::new(),
      target,
      combined:     false,
      contact_menu: notification.kind.contact_menu(),
      source_ids:   vec![notification.id],
    });
  }

  // Render note labels once actor lists are final.
  for unit in &mut units {
    unit.note = note_label(unit.kind, &unit.actors);
  }

  Ok(units)
}

// ─── Labels ──────────────────────────────────────────────────────────────────

fn actor_phrase(actors: &[Actor]) -> String {
  match actors {
    [] => "Someone".to_string(),
    [a] => a.name.clone(),
    [a, b] => format!("{} and {}", a.name, b.name),
    [a, rest @ ..] => format!("{} and {} others", a.name, rest.len()),
  }
}

fn note_label(kind: NotificationKind, actors: &[Actor]) -> String {
  kind.props().phrase.replace("{who}", &actor_phrase(actors))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use chrono::{Duration, TimeZone, Utc};
  use tidings_core::target::{TargetResolution, TargetSummary};
  use uuid::Uuid;

  use super::*;

  /// Registry stub backed by a fixed map; everything else is unresolved.
  struct FixedRegistry(HashMap<TargetRef, TargetSummary>);

  impl FixedRegistry {
    fn empty() -> Self { Self(HashMap::new()) }

    fn with(target: TargetRef, title: &str) -> Self {
      let mut map = HashMap::new();
      map.insert(target, TargetSummary {
        title:       title.to_string(),
        author_name: None,
      });
      Self(map)
    }
  }

  impl TargetRegistry for FixedRegistry {
    type Error = std::convert::Infallible;

    async fn resolve(
      &self,
      target: TargetRef,
    ) -> std::result::Result<TargetResolution, Self::Error> {
      Ok(match self.0.get(&target) {
        Some(summary) => TargetResolution::Resolved(summary.clone()),
        None => TargetResolution::Unresolved,
      })
    }
  }

  fn actor(name: &str) -> Actor {
    Actor::new(Uuid::new_v4(), name)
  }

  fn note(
    kind: NotificationKind,
    target: TargetRef,
    actors: Vec<Actor>,
    minutes_ago: i64,
  ) -> Notification {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let at = now - Duration::minutes(minutes_ago);
    Notification {
      id: Uuid::new_v4(),
      recipient: Uuid::new_v4(),
      target,
      kind,
      actors,
      unread: true,
      created_at: at,
      updated_at: at,
    }
  }

  fn test_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
  }

  #[tokio::test]
  async fn combinable_rows_merge_within_the_page() {
    let post = TargetRef::post(Uuid::new_v4());
    let carol = actor("Carol");
    let bob = actor("Bob");

    // Page order is most-recent-first: the also-commented row is primary.
    let page = vec![
      note(NotificationKind::AlsoCommented, post, vec![carol.clone()], 1),
      note(NotificationKind::CommentOnPost, post, vec![bob.clone()], 10),
    ];

    let units = aggregate(&page, &FixedRegistry::with(post, "A post"), test_now())
      .await
      .unwrap();

    assert_eq!(units.len(), 1);
    let unit = &units[0];
    assert_eq!(unit.id, page[0].id);
    assert_eq!(unit.kind, NotificationKind::AlsoCommented);
    assert!(unit.combined);
    assert_eq!(unit.actors, vec![carol, bob]);
    assert_eq!(unit.source_ids, vec![page[0].id, page[1].id]);
    assert_eq!(unit.note, "Carol and Bob also commented on a post");
  }

  #[tokio::test]
  async fn merged_unit_keeps_the_primary_position() {
    let post = TargetRef::post(Uuid::new_v4());
    let other = TargetRef::post(Uuid::new_v4());

    let page = vec![
      note(NotificationKind::AlsoCommented, post, vec![actor("Carol")], 1),
      note(NotificationKind::Liked, other, vec![actor("Dan")], 2),
      note(NotificationKind::CommentOnPost, post, vec![actor("Bob")], 3),
    ];

    let units = aggregate(&page, &FixedRegistry::empty(), test_now())
      .await
      .unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].id, page[0].id);
    assert_eq!(units[1].kind, NotificationKind::Liked);
  }

  #[tokio::test]
  async fn non_combinable_kinds_never_merge() {
    let post = TargetRef::post(Uuid::new_v4());

    let page = vec![
      note(NotificationKind::Liked, post, vec![actor("Bob")], 1),
      note(NotificationKind::Mentioned, post, vec![actor("Carol")], 2),
    ];

    let units = aggregate(&page, &FixedRegistry::empty(), test_now())
      .await
      .unwrap();

    assert_eq!(units.len(), 2);
    assert!(units.iter().all(|u| !u.combined));
  }

  #[tokio::test]
  async fn merging_does_not_duplicate_actors() {
    let post = TargetRef::post(Uuid::new_v4());
    let bob = actor("Bob");

    let page = vec![
      note(NotificationKind::AlsoCommented, post, vec![bob.clone()], 1),
      note(NotificationKind::CommentOnPost, post, vec![bob.clone()], 5),
    ];

    let units = aggregate(&page, &FixedRegistry::empty(), test_now())
      .await
      .unwrap();

    assert_eq!(units[0].actors, vec![bob]);
  }

  #[tokio::test]
  async fn deleted_target_degrades_to_placeholder() {
    let gone = TargetRef::post(Uuid::new_v4());
    let page = vec![note(NotificationKind::Liked, gone, vec![actor("Bob")], 1)];

    let units = aggregate(&page, &FixedRegistry::empty(), test_now())
      .await
      .unwrap();

    assert_eq!(units.len(), 1);
    assert_eq!(units[0].target, TargetDisplay::Missing);
  }

  #[tokio::test]
  async fn started_sharing_carries_the_contact_menu_flag() {
    let eve = actor("Eve");
    let page = vec![
      note(
        NotificationKind::StartedSharing,
        TargetRef::person(eve.id),
        vec![eve.clone()],
        1,
      ),
      note(
        NotificationKind::Liked,
        TargetRef::post(Uuid::new_v4()),
        vec![actor("Bob")],
        2,
      ),
    ];

    let units = aggregate(&page, &FixedRegistry::empty(), test_now())
      .await
      .unwrap();

    assert!(units[0].contact_menu);
    assert!(!units[1].contact_menu);
    assert_eq!(units[0].note, "Eve started sharing with you");
  }

  #[tokio::test]
  async fn time_ago_reflects_updated_at() {
    let page = vec![note(
      NotificationKind::Liked,
      TargetRef::post(Uuid::new_v4()),
      vec![actor("Bob")],
      90,
    )];

    let units = aggregate(&page, &FixedRegistry::empty(), test_now())
      .await
      .unwrap();

    assert_eq!(units[0].time_ago, "1 hour ago");
  }

  #[test]
  fn actor_phrases() {
    let a = actor("Alice");
    let b = actor("Bob");
    let c = actor("Carol");

    assert_eq!(actor_phrase(&[]), "Someone");
    assert_eq!(actor_phrase(&[a.clone()]), "Alice");
    assert_eq!(actor_phrase(&[a.clone(), b.clone()]), "Alice and Bob");
    assert_eq!(actor_phrase(&[a, b, c]), "Alice and 2 others");
  }
}
