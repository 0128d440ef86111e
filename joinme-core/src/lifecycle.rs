//! Temporal state of an event.
//!
//! An event moves upcoming -> ongoing -> expired as wall-clock time passes.
//! The ongoing window is the half-open interval `[start, start + duration)`,
//! so the end instant itself already counts as expired. A zero-length event
//! has an empty ongoing window and expires at its start.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLifecycle {
    Upcoming,
    Ongoing,
    Expired,
}

impl fmt::Display for EventLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventLifecycle::Upcoming => write!(f, "upcoming"),
            EventLifecycle::Ongoing => write!(f, "ongoing"),
            EventLifecycle::Expired => write!(f, "expired"),
        }
    }
}

/// Classify an event starting at `start` and lasting `duration_minutes` at instant `now`.
pub fn classify(now: DateTime<Utc>, start: DateTime<Utc>, duration_minutes: u32) -> EventLifecycle {
    let end = start + Duration::minutes(i64::from(duration_minutes));

    if start > now {
        EventLifecycle::Upcoming
    } else if now < end {
        EventLifecycle::Ongoing
    } else {
        EventLifecycle::Expired
    }
}

/// Expired events only, most recent start first.
pub fn expired_history(events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
    let mut expired: Vec<Event> = events
        .into_iter()
        .filter(|e| e.lifecycle(now) == EventLifecycle::Expired)
        .collect();

    expired.sort_by(|a, b| b.date.cmp(&a.date));
    expired
}

/// Upcoming and ongoing events, soonest start first.
pub fn active_feed(events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
    let mut active: Vec<Event> = events
        .into_iter()
        .filter(|e| e.lifecycle(now) != EventLifecycle::Expired)
        .collect();

    active.sort_by(|a, b| a.date.cmp(&b.date));
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::test_event;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_classify_before_start_is_upcoming() {
        let now = start() - Duration::seconds(1);
        assert_eq!(classify(now, start(), 60), EventLifecycle::Upcoming);
    }

    #[test]
    fn test_classify_at_start_is_ongoing() {
        assert_eq!(classify(start(), start(), 60), EventLifecycle::Ongoing);
    }

    #[test]
    fn test_classify_end_boundary_is_half_open() {
        for d in [1u32, 2, 30, 90, 24 * 60] {
            let end = start() + Duration::minutes(i64::from(d));
            assert_eq!(classify(end, start(), d), EventLifecycle::Expired, "d = {d}");
            assert_eq!(
                classify(end - Duration::minutes(1), start(), d),
                EventLifecycle::Ongoing,
                "d = {d}"
            );
        }
    }

    #[test]
    fn test_classify_zero_duration_skips_ongoing() {
        assert_eq!(classify(start(), start(), 0), EventLifecycle::Expired);
        assert_eq!(
            classify(start() - Duration::minutes(1), start(), 0),
            EventLifecycle::Upcoming
        );
    }

    #[test]
    fn test_expired_history_filters_and_sorts_descending() {
        let now = start();
        let week_old = test_event("week", now - Duration::days(7), 60);
        let upcoming = test_event("soon", now + Duration::hours(2), 60);
        let day_old = test_event("day", now - Duration::days(1), 60);
        let ongoing = test_event("now", now - Duration::minutes(10), 60);

        let history = expired_history(vec![week_old, upcoming, day_old, ongoing], now);
        let ids: Vec<&str> = history.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["day", "week"]);
    }

    #[test]
    fn test_active_feed_sorts_ascending() {
        let now = start();
        let later = test_event("later", now + Duration::days(2), 60);
        let ongoing = test_event("ongoing", now - Duration::minutes(5), 30);
        let past = test_event("past", now - Duration::days(1), 60);

        let feed = active_feed(vec![later, past, ongoing], now);
        let ids: Vec<&str> = feed.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["ongoing", "later"]);
    }
}
