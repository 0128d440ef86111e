//! UI-facing list state driven by a repository.
//!
//! A [`ListViewModel`] loads its source repository, passes the entities
//! through a selector and publishes a [`ListState`] on a watch channel.
//! Every refresh takes a sequence number; only the latest one issued may
//! publish, so results of superseded refreshes are dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::entity::Entity;
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        ListState {
            items: Vec::new(),
            error_message: None,
            is_loading: false,
        }
    }
}

/// Picks and orders the entities a view shows.
pub type Selector<T> = Arc<dyn Fn(Vec<T>, DateTime<Utc>) -> Vec<T> + Send + Sync>;

pub struct ListViewModel<T: Entity> {
    source: Arc<dyn Repository<T>>,
    selector: Selector<T>,
    state: watch::Sender<ListState<T>>,
    latest: AtomicU64,
}

impl<T: Entity> ListViewModel<T> {
    pub fn new(source: Arc<dyn Repository<T>>, selector: Selector<T>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        ListViewModel {
            source,
            selector,
            state,
            latest: AtomicU64::new(0),
        }
    }

    /// Shows every entity in source order.
    pub fn unfiltered(source: Arc<dyn Repository<T>>) -> Self {
        Self::new(source, Arc::new(|items: Vec<T>, _: DateTime<Utc>| items))
    }

    pub fn state(&self) -> ListState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<T>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self) {
        self.refresh_at(Utc::now()).await;
    }

    /// Reload from the source, selecting against `now`.
    pub async fn refresh_at(&self, now: DateTime<Utc>) {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.is_loading = true);

        let next = match self.source.list().await {
            Ok(items) => ListState {
                items: (self.selector)(items, now),
                error_message: None,
                is_loading: false,
            },
            Err(e) => {
                warn!(collection = T::COLLECTION, seq, error = %e, "load failed");
                ListState {
                    items: Vec::new(),
                    error_message: Some(e.to_string()),
                    is_loading: false,
                }
            }
        };

        // Compared under the channel lock so an older result can never land
        // after a newer one.
        let published = self.state.send_if_modified(|s| {
            if self.latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            *s = next;
            true
        });

        if !published {
            debug!(collection = T::COLLECTION, seq, "dropping superseded result");
        }
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error_message.take().is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;
    use crate::repository::LocalRepository;

    #[tokio::test]
    async fn test_unfiltered_refresh_publishes_items() {
        let source = Arc::new(LocalRepository::with_items(vec![
            Group::new("a", "A", "o"),
            Group::new("b", "B", "o"),
        ]));
        let vm: ListViewModel<Group> = ListViewModel::unfiltered(source);
        let mut rx = vm.subscribe();

        vm.refresh().await;

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.items.len(), 2);
        assert!(!state.is_loading);
        assert!(state.error_message.is_none());
    }

    #[tokio::test]
    async fn test_clear_error_without_error_is_silent() {
        let vm: ListViewModel<Group> = ListViewModel::unfiltered(Arc::new(LocalRepository::new()));
        let rx = vm.subscribe();

        vm.clear_error();

        assert!(!rx.has_changed().unwrap());
    }
}
