//! In-memory mirror of a remote collection.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::{JoinMeError, JoinMeResult};
use crate::repository::{Repository, check_edit_id};

struct Mirror<T> {
    items: Vec<T>,
    /// Newest ticket applied, by a snapshot or a single write (0 = never)
    generation: u64,
}

impl<T: Entity> Mirror<T> {
    fn upsert(&mut self, entity: T) {
        match self.items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(existing) => *existing = entity,
            None => self.items.push(entity),
        }
    }

    fn discard(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|e| e.id() != id);
        self.items.len() != before
    }

    fn advance(&mut self, generation: u64) {
        self.generation = self.generation.max(generation);
    }
}

/// Ordered entity cache behind a read-write lock. Lookups are linear scans.
pub struct LocalRepository<T: Entity> {
    inner: RwLock<Mirror<T>>,
}

impl<T: Entity> Default for LocalRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> LocalRepository<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    pub fn with_items(items: Vec<T>) -> Self {
        LocalRepository {
            inner: RwLock::new(Mirror {
                items,
                generation: 0,
            }),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }

    /// Clear the collection and add all of `items`, under one write lock.
    pub async fn replace_all(&self, items: Vec<T>) {
        let mut mirror = self.inner.write().await;
        mirror.items.clear();
        mirror.items.extend(items);
    }

    /// Like [`replace_all`](Self::replace_all), but only if `generation` is newer
    /// than the snapshot currently held. Returns whether the snapshot was applied.
    pub async fn replace_if_newer(&self, generation: u64, items: Vec<T>) -> bool {
        let mut mirror = self.inner.write().await;

        if generation <= mirror.generation {
            debug!(
                collection = T::COLLECTION,
                generation,
                current = mirror.generation,
                "skipping stale snapshot"
            );
            return false;
        }

        mirror.items.clear();
        mirror.items.extend(items);
        mirror.generation = generation;
        true
    }

    /// Insert or replace in place by id.
    pub async fn upsert(&self, entity: T) {
        self.inner.write().await.upsert(entity);
    }

    /// Remove by id if cached. Returns whether anything was removed.
    pub async fn discard(&self, id: &str) -> bool {
        self.inner.write().await.discard(id)
    }

    /// [`upsert`](Self::upsert) a write the remote accepted under `generation`.
    /// Snapshots with an older ticket are rejected afterwards, since they may
    /// predate the write.
    pub async fn upsert_at(&self, generation: u64, entity: T) {
        let mut mirror = self.inner.write().await;
        mirror.upsert(entity);
        mirror.advance(generation);
    }

    /// [`discard`](Self::discard) counterpart of [`upsert_at`](Self::upsert_at).
    pub async fn discard_at(&self, generation: u64, id: &str) -> bool {
        let mut mirror = self.inner.write().await;
        let removed = mirror.discard(id);
        mirror.advance(generation);
        removed
    }

    /// Write the current items as JSON to `path` (temp file + rename).
    pub async fn save_snapshot(&self, path: &Path) -> JoinMeResult<()> {
        let content = {
            let mirror = self.inner.read().await;
            serde_json::to_vec_pretty(&mirror.items)?
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut temp = path.as_os_str().to_owned();
        temp.push(".tmp");

        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, path).await?;
        Ok(())
    }

    /// Load a snapshot written by [`save_snapshot`](Self::save_snapshot).
    /// A missing file yields an empty cache.
    pub async fn load_snapshot(path: &Path) -> JoinMeResult<Self> {
        let content = match tokio::fs::read(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };

        let items: Vec<T> = serde_json::from_slice(&content)?;
        Ok(Self::with_items(items))
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for LocalRepository<T> {
    async fn list(&self) -> JoinMeResult<Vec<T>> {
        Ok(self.inner.read().await.items.clone())
    }

    async fn get(&self, id: &str) -> JoinMeResult<Option<T>> {
        let mirror = self.inner.read().await;
        Ok(mirror.items.iter().find(|e| e.id() == id).cloned())
    }

    async fn add(&self, entity: T) -> JoinMeResult<()> {
        self.upsert(entity).await;
        Ok(())
    }

    async fn edit(&self, id: &str, entity: T) -> JoinMeResult<()> {
        check_edit_id(id, &entity)?;

        let mut mirror = self.inner.write().await;
        let slot = mirror
            .items
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| JoinMeError::not_found(T::COLLECTION, id))?;
        *slot = entity;
        Ok(())
    }

    async fn remove(&self, id: &str) -> JoinMeResult<()> {
        if self.discard(id).await {
            Ok(())
        } else {
            Err(JoinMeError::not_found(T::COLLECTION, id))
        }
    }

    fn new_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
