//! Relative-time labels ("3 hours ago") for display records.

use chrono::{DateTime, Utc};

/// Human label for how long ago `then` was, relative to `now`.
///
/// Future timestamps (clock skew between writers) clamp to "just now".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
  let seconds = (now - then).num_seconds().max(0);

  if seconds < 60 {
    return "just now".to_string();
  }
  let minutes = seconds / 60;
  if minutes < 60 {
    return plural(minutes, "minute");
  }
  let hours = minutes / 60;
  if hours < 24 {
    return plural(hours, "hour");
  }
  let days = hours / 24;
  if days < 30 {
    return plural(days, "day");
  }
  if days < 365 {
    return plural(days / 30, "month");
  }
  plural(days / 365, "year")
}

fn plural(n: i64, unit: &str) -> String {
  if n == 1 {
    format!("1 {unit} ago")
  } else {
    format!("{n} {unit}s ago")
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::relative_time;

  #[test]
  fn labels_by_magnitude() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    assert_eq!(relative_time(now, now), "just now");
    assert_eq!(relative_time(now - Duration::seconds(59), now), "just now");
    assert_eq!(relative_time(now - Duration::seconds(60), now), "1 minute ago");
    assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
    assert_eq!(relative_time(now - Duration::hours(1), now), "1 hour ago");
    assert_eq!(relative_time(now - Duration::hours(23), now), "23 hours ago");
    assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
    assert_eq!(relative_time(now - Duration::days(45), now), "1 month ago");
    assert_eq!(relative_time(now - Duration::days(400), now), "1 year ago");
  }

  #[test]
  fn future_timestamps_clamp_to_just_now() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    assert_eq!(relative_time(now + Duration::hours(2), now), "just now");
  }
}
