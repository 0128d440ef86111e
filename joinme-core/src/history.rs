//! Past events the user can look back on.

use std::ops::Deref;
use std::sync::Arc;

use crate::event::Event;
use crate::lifecycle::{active_feed, expired_history};
use crate::repository::Repository;
use crate::view_state::ListViewModel;

/// Expired events, most recent first.
pub struct HistoryViewModel(ListViewModel<Event>);

impl HistoryViewModel {
    pub fn new(source: Arc<dyn Repository<Event>>) -> Self {
        HistoryViewModel(ListViewModel::new(source, Arc::new(expired_history)))
    }
}

impl Deref for HistoryViewModel {
    type Target = ListViewModel<Event>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Upcoming and ongoing events, soonest first.
pub fn feed_view_model(source: Arc<dyn Repository<Event>>) -> ListViewModel<Event> {
    ListViewModel::new(source, Arc::new(active_feed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::test_event;
    use crate::repository::LocalRepository;
    use chrono::{Duration, TimeZone, Utc};

    #[tokio::test]
    async fn test_history_keeps_only_expired() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        let source = Arc::new(LocalRepository::with_items(vec![
            // ended 2 hours ago
            test_event("ended", now - Duration::hours(3), 60),
            test_event("ongoing", now - Duration::minutes(30), 60),
            test_event("soon", now + Duration::hours(2), 60),
        ]));

        let history = HistoryViewModel::new(source);
        history.refresh_at(now).await;

        let state = history.state();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, "ended");
    }

    #[tokio::test]
    async fn test_feed_excludes_expired() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        let source = Arc::new(LocalRepository::with_items(vec![
            test_event("soon", now + Duration::hours(2), 60),
            test_event("ended", now - Duration::hours(3), 60),
        ]));

        let feed = feed_view_model(source);
        feed.refresh_at(now).await;

        let ids: Vec<String> = feed.state().items.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["soon"]);
    }
}
