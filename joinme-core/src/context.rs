//! Wiring of repositories and view models.
//!
//! An [`AppContext`] is built once and passed to whatever needs repositories.
//! Tests construct one around their own remote repositories instead of
//! swapping out global state.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::JoinMeConfig;
use crate::entity::Entity;
use crate::error::{JoinMeError, JoinMeResult};
use crate::event::Event;
use crate::group::Group;
use crate::history::{HistoryViewModel, feed_view_model};
use crate::notify::{EventNotifier, WorkScheduler};
use crate::repository::{LocalRepository, RemoteRepository, Repository};
use crate::store::{HttpTransport, StoreClient};
use crate::sync::CachedRepository;
use crate::view_state::ListViewModel;

pub struct AppContext {
    pub config: JoinMeConfig,
    pub events: Arc<CachedRepository<Event>>,
    pub groups: Arc<CachedRepository<Group>>,
    offline: bool,
}

impl AppContext {
    /// Connect to the store named by `config.store.endpoint`.
    pub fn from_config(config: JoinMeConfig) -> JoinMeResult<Self> {
        let endpoint = config.store.endpoint.clone().ok_or_else(|| {
            JoinMeError::Config("No store endpoint configured (store.endpoint)".into())
        })?;

        let transport = HttpTransport::new(&endpoint, config.store.timeout())?;
        debug!(%endpoint, "using remote store");
        Ok(Self::with_store(config, StoreClient::new(Arc::new(transport))))
    }

    pub fn with_store(config: JoinMeConfig, client: StoreClient) -> Self {
        Self::with_repositories(
            config,
            Arc::new(RemoteRepository::<Event>::new(client.clone())),
            Arc::new(RemoteRepository::<Group>::new(client)),
        )
    }

    /// Build around explicit remote repositories.
    pub fn with_repositories(
        config: JoinMeConfig,
        events: Arc<dyn Repository<Event>>,
        groups: Arc<dyn Repository<Group>>,
    ) -> Self {
        AppContext {
            config,
            events: Arc::new(CachedRepository::new(events)),
            groups: Arc::new(CachedRepository::new(groups)),
            offline: false,
        }
    }

    /// A context that only serves previously saved snapshots.
    /// Remote calls fail with a configuration error.
    pub async fn offline(config: JoinMeConfig) -> JoinMeResult<Self> {
        let events: LocalRepository<Event> =
            LocalRepository::load_snapshot(&snapshot_path::<Event>(&config)?).await?;
        let groups: LocalRepository<Group> =
            LocalRepository::load_snapshot(&snapshot_path::<Group>(&config)?).await?;

        Ok(AppContext {
            events: Arc::new(CachedRepository::with_local(
                Arc::new(Unreachable),
                Arc::new(events),
            )),
            groups: Arc::new(CachedRepository::with_local(
                Arc::new(Unreachable),
                Arc::new(groups),
            )),
            config,
            offline: true,
        })
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// What view models read from: the remote when online, the mirror otherwise.
    pub fn event_source(&self) -> Arc<dyn Repository<Event>> {
        if self.offline {
            self.events.clone()
        } else {
            self.events.remote()
        }
    }

    pub fn group_source(&self) -> Arc<dyn Repository<Group>> {
        if self.offline {
            self.groups.clone()
        } else {
            self.groups.remote()
        }
    }

    /// Refresh both caches from the remote and write them to disk.
    pub async fn sync(&self) -> JoinMeResult<(usize, usize)> {
        let events = self.events.refresh().await?;
        let groups = self.groups.refresh().await?;

        self.events
            .local()
            .save_snapshot(&snapshot_path::<Event>(&self.config)?)
            .await?;
        self.groups
            .local()
            .save_snapshot(&snapshot_path::<Group>(&self.config)?)
            .await?;

        Ok((events.fetched, groups.fetched))
    }

    /// Past events, most recent first.
    pub fn history(&self) -> HistoryViewModel {
        HistoryViewModel::new(self.event_source())
    }

    /// Upcoming and ongoing events.
    pub fn feed(&self) -> ListViewModel<Event> {
        feed_view_model(self.event_source())
    }

    pub fn groups_view(&self) -> ListViewModel<Group> {
        ListViewModel::unfiltered(self.group_source())
    }

    pub fn notifier(&self, scheduler: Arc<dyn WorkScheduler>) -> EventNotifier {
        EventNotifier::new(scheduler, self.config.notifications.lead_minutes)
    }
}

fn snapshot_path<T: Entity>(config: &JoinMeConfig) -> JoinMeResult<PathBuf> {
    Ok(config.cache_dir()?.join(format!("{}.json", T::COLLECTION)))
}

/// Remote stand-in for offline contexts.
struct Unreachable;

#[async_trait::async_trait]
impl<T: Entity> Repository<T> for Unreachable {
    async fn list(&self) -> JoinMeResult<Vec<T>> {
        Err(offline_error())
    }

    async fn get(&self, _id: &str) -> JoinMeResult<Option<T>> {
        Err(offline_error())
    }

    async fn add(&self, _entity: T) -> JoinMeResult<()> {
        Err(offline_error())
    }

    async fn edit(&self, _id: &str, _entity: T) -> JoinMeResult<()> {
        Err(offline_error())
    }

    async fn remove(&self, _id: &str) -> JoinMeResult<()> {
        Err(offline_error())
    }

    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

fn offline_error() -> JoinMeError {
    JoinMeError::Config("Offline: no store endpoint configured".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_from_config_requires_endpoint() {
        let err = AppContext::from_config(JoinMeConfig::default()).err().unwrap();
        assert!(matches!(err, JoinMeError::Config(_)));
    }

    #[tokio::test]
    async fn test_sync_then_offline_serves_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let dir = tempfile::tempdir().unwrap();
        let mut config = JoinMeConfig::default();
        config.cache_dir = Some(dir.path().join("cache"));

        let online = AppContext::with_store(config.clone(), StoreClient::new(store.clone()));
        online
            .groups
            .add(Group::new("g1", "Hikers", "owner"))
            .await
            .unwrap();
        assert_eq!(online.sync().await.unwrap(), (0, 1));

        let offline = AppContext::offline(config.clone()).await.unwrap();
        assert!(offline.is_offline());

        let view = offline.groups_view();
        view.refresh().await;
        assert_eq!(view.state().items.len(), 1);
        assert!(offline.groups.refresh().await.is_err());
    }
}
