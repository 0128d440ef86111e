//! Remote-to-local synchronization.
//!
//! A refresh is a full replace-on-read: the remote collection is fetched and
//! swapped into the local mirror in one step. There is no diffing and no queue
//! of pending local writes. Each refresh and each write-through takes a ticket;
//! a snapshot is applied only when its ticket is newer than the mirror's, so a
//! slow refresh that finishes after a later refresh or write is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::entity::Entity;
use crate::error::JoinMeResult;
use crate::repository::{LocalRepository, Repository};

/// Outcome of one [`CachedRepository::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub ticket: u64,
    /// Number of entities fetched from the remote
    pub fetched: usize,
    /// False when a newer refresh had already been applied
    pub applied: bool,
}

/// A remote repository with a local mirror.
///
/// Reads are served from the mirror. Writes go to the remote first and are
/// mirrored locally once the remote accepted them.
pub struct CachedRepository<T: Entity> {
    remote: Arc<dyn Repository<T>>,
    local: Arc<LocalRepository<T>>,
    tickets: AtomicU64,
}

impl<T: Entity> CachedRepository<T> {
    pub fn new(remote: Arc<dyn Repository<T>>) -> Self {
        Self::with_local(remote, Arc::new(LocalRepository::new()))
    }

    pub fn with_local(remote: Arc<dyn Repository<T>>, local: Arc<LocalRepository<T>>) -> Self {
        CachedRepository {
            remote,
            local,
            tickets: AtomicU64::new(0),
        }
    }

    pub fn remote(&self) -> Arc<dyn Repository<T>> {
        self.remote.clone()
    }

    pub fn local(&self) -> Arc<LocalRepository<T>> {
        self.local.clone()
    }

    /// Tickets order refreshes and write-throughs. A write takes its ticket
    /// only after the remote accepted it, so every refresh with a newer ticket
    /// fetches after that write.
    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the local mirror with the remote's current collection.
    ///
    /// On remote failure the mirror is left untouched and the error is returned.
    pub async fn refresh(&self) -> JoinMeResult<RefreshOutcome> {
        let ticket = self.next_ticket();
        debug!(collection = T::COLLECTION, ticket, "refresh started");

        let snapshot = match self.remote.list().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(collection = T::COLLECTION, ticket, error = %e, "refresh failed");
                return Err(e);
            }
        };

        let fetched = snapshot.len();
        let applied = self.local.replace_if_newer(ticket, snapshot).await;

        debug!(collection = T::COLLECTION, ticket, fetched, applied, "refresh finished");
        Ok(RefreshOutcome {
            ticket,
            fetched,
            applied,
        })
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for CachedRepository<T> {
    async fn list(&self) -> JoinMeResult<Vec<T>> {
        self.local.list().await
    }

    async fn get(&self, id: &str) -> JoinMeResult<Option<T>> {
        self.local.get(id).await
    }

    async fn add(&self, entity: T) -> JoinMeResult<()> {
        self.remote.add(entity.clone()).await?;
        self.local.upsert_at(self.next_ticket(), entity).await;
        Ok(())
    }

    async fn edit(&self, id: &str, entity: T) -> JoinMeResult<()> {
        self.remote.edit(id, entity.clone()).await?;
        self.local.upsert_at(self.next_ticket(), entity).await;
        Ok(())
    }

    async fn remove(&self, id: &str) -> JoinMeResult<()> {
        self.remote.remove(id).await?;
        // The mirror may predate the entity; the remote is the authority here.
        self.local.discard_at(self.next_ticket(), id).await;
        Ok(())
    }

    fn new_id(&self) -> String {
        self.remote.new_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Group;

    fn remote_with(ids: &[&str]) -> Arc<LocalRepository<Group>> {
        Arc::new(LocalRepository::with_items(
            ids.iter().map(|id| Group::new(id, id, "owner")).collect(),
        ))
    }

    #[tokio::test]
    async fn test_refresh_mirrors_remote_exactly() {
        let remote = remote_with(&["a", "b", "c"]);
        let cached = CachedRepository::with_local(
            remote.clone(),
            Arc::new(LocalRepository::with_items(vec![Group::new("stale", "x", "o")])),
        );

        let outcome = cached.refresh().await.unwrap();

        assert!(outcome.applied);
        assert_eq!(outcome.fetched, 3);
        assert_eq!(cached.list().await.unwrap(), remote.list().await.unwrap());
    }

    #[tokio::test]
    async fn test_write_through_reaches_remote_and_mirror() {
        let remote = remote_with(&["a"]);
        let cached = CachedRepository::new(remote.clone());
        cached.refresh().await.unwrap();

        cached.add(Group::new("b", "b", "owner")).await.unwrap();
        cached.remove("a").await.unwrap();

        let ids: Vec<String> = remote.list().await.unwrap().into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(cached.list().await.unwrap(), remote.list().await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_remote_write_leaves_mirror_untouched() {
        let remote = remote_with(&[]);
        let cached = CachedRepository::new(remote.clone());

        let err = cached.edit("ghost", Group::new("ghost", "g", "o")).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(cached.local().is_empty().await);
    }
}
