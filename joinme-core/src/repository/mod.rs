//! Repository capability over entity collections.
//!
//! Two variants implement it: [`RemoteRepository`] talks to the remote
//! document store (the source of truth) and [`LocalRepository`] is an
//! in-memory mirror. [`crate::sync::CachedRepository`] pairs them.

mod local;
mod remote;

pub use local::LocalRepository;
pub use remote::RemoteRepository;

use async_trait::async_trait;

use crate::entity::Entity;
use crate::error::JoinMeResult;

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All entities, in collection order.
    async fn list(&self) -> JoinMeResult<Vec<T>>;

    async fn get(&self, id: &str) -> JoinMeResult<Option<T>>;

    async fn add(&self, entity: T) -> JoinMeResult<()>;

    /// Replace the record stored under `id` with `entity`.
    /// `entity.id()` must equal `id`.
    async fn edit(&self, id: &str, entity: T) -> JoinMeResult<()>;

    async fn remove(&self, id: &str) -> JoinMeResult<()>;

    /// A fresh id for an entity about to be added.
    fn new_id(&self) -> String;
}

fn check_edit_id<T: Entity>(id: &str, entity: &T) -> JoinMeResult<()> {
    if entity.id() != id {
        return Err(crate::error::JoinMeError::InvalidArgument(format!(
            "cannot store {} '{}' under id '{}'",
            T::COLLECTION,
            entity.id(),
            id
        )));
    }
    Ok(())
}
