//! Notification kinds and their display properties.
//!
//! Historically each kind carried its own rendering subclass; here the
//! per-kind variation lives in one explicit property table so nothing
//! dispatches on anything but the tag.

use serde::{Deserialize, Serialize};

/// Tag identifying what happened. Immutable once a notification is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
  CommentOnPost,
  AlsoCommented,
  Liked,
  Mentioned,
  Reshared,
  StartedSharing,
}

/// Display properties of a kind.
#[derive(Debug, Clone, Copy)]
pub struct KindProps {
  /// Kinds sharing a combine group merge into one display unit when they
  /// reference the same target within a result page.
  pub combine_group: Option<&'static str>,
  /// Whether the rendering layer may offer contact-list actions for this
  /// kind of notification.
  pub contact_menu:  bool,
  /// Note label template; `{who}` is replaced with the actor phrase.
  pub phrase:        &'static str,
}

impl NotificationKind {
  pub const ALL: [NotificationKind; 6] = [
    NotificationKind::CommentOnPost,
    NotificationKind::AlsoCommented,
    NotificationKind::Liked,
    NotificationKind::Mentioned,
    NotificationKind::Reshared,
    NotificationKind::StartedSharing,
  ];

  /// The snake_case name used in storage and query strings.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::CommentOnPost => "comment_on_post",
      Self::AlsoCommented => "also_commented",
      Self::Liked => "liked",
      Self::Mentioned => "mentioned",
      Self::Reshared => "reshared",
      Self::StartedSharing => "started_sharing",
    }
  }

  /// Parse a storage or query-string name. Unknown names yield `None`; read
  /// paths treat that as "no filter" rather than failing the request.
  pub fn parse(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|k| k.as_str() == s)
  }

  pub fn props(&self) -> KindProps {
    match self {
      Self::CommentOnPost => KindProps {
        combine_group: Some("commented"),
        contact_menu:  false,
        phrase:        "{who} commented on your post",
      },
      Self::AlsoCommented => KindProps {
        combine_group: Some("commented"),
        contact_menu:  false,
        phrase:        "{who} also commented on a post",
      },
      Self::Liked => KindProps {
        combine_group: None,
        contact_menu:  false,
        phrase:        "{who} liked your post",
      },
      Self::Mentioned => KindProps {
        combine_group: None,
        contact_menu:  false,
        phrase:        "{who} mentioned you in a post",
      },
      Self::Reshared => KindProps {
        combine_group: None,
        contact_menu:  false,
        phrase:        "{who} reshared your post",
      },
      Self::StartedSharing => KindProps {
        combine_group: None,
        contact_menu:  true,
        phrase:        "{who} started sharing with you",
      },
    }
  }

  pub fn combine_group(&self) -> Option<&'static str> {
    self.props().combine_group
  }

  pub fn contact_menu(&self) -> bool { self.props().contact_menu }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn as_str_parse_roundtrip() {
    for kind in NotificationKind::ALL {
      assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
    }
  }

  #[test]
  fn unknown_name_parses_to_none() {
    assert_eq!(NotificationKind::parse("poked"), None);
    assert_eq!(NotificationKind::parse(""), None);
  }

  #[test]
  fn only_started_sharing_offers_contact_menu() {
    for kind in NotificationKind::ALL {
      assert_eq!(
        kind.contact_menu(),
        kind == NotificationKind::StartedSharing
      );
    }
  }

  #[test]
  fn comment_kinds_share_a_combine_group() {
    assert_eq!(
      NotificationKind::CommentOnPost.combine_group(),
      NotificationKind::AlsoCommented.combine_group(),
    );
    assert!(NotificationKind::Liked.combine_group().is_none());
    assert!(NotificationKind::StartedSharing.combine_group().is_none());
  }
}
