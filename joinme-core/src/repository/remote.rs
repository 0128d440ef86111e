//! Repository backed by the remote document store.

use std::marker::PhantomData;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entity::Entity;
use crate::error::JoinMeResult;
use crate::repository::{Repository, check_edit_id};
use crate::store::StoreClient;
use crate::store::protocol::{DeleteDocument, Document, GetDocument, ListDocuments, PutDocument};

/// Every call is one store round-trip; errors are returned unchanged.
pub struct RemoteRepository<T: Entity> {
    client: StoreClient,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> RemoteRepository<T> {
    pub fn new(client: StoreClient) -> Self {
        RemoteRepository {
            client,
            _entity: PhantomData,
        }
    }

    fn to_document(entity: &T) -> JoinMeResult<Document> {
        Ok(Document {
            id: entity.id().to_string(),
            fields: serde_json::to_value(entity)?,
        })
    }

    fn from_document(document: Document) -> JoinMeResult<T> {
        let mut fields = document.fields;
        // The document key is authoritative for the id.
        if let Some(map) = fields.as_object_mut() {
            map.insert("id".to_string(), serde_json::Value::String(document.id));
        }
        Ok(serde_json::from_value(fields)?)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for RemoteRepository<T> {
    async fn list(&self) -> JoinMeResult<Vec<T>> {
        let documents = self
            .client
            .call(ListDocuments {
                collection: T::COLLECTION.to_string(),
            })
            .await?;

        documents.into_iter().map(Self::from_document).collect()
    }

    async fn get(&self, id: &str) -> JoinMeResult<Option<T>> {
        let document = self
            .client
            .call(GetDocument {
                collection: T::COLLECTION.to_string(),
                id: id.to_string(),
            })
            .await?;

        document.map(Self::from_document).transpose()
    }

    async fn add(&self, entity: T) -> JoinMeResult<()> {
        self.client
            .call(PutDocument {
                collection: T::COLLECTION.to_string(),
                document: Self::to_document(&entity)?,
            })
            .await
    }

    async fn edit(&self, id: &str, entity: T) -> JoinMeResult<()> {
        check_edit_id(id, &entity)?;
        self.add(entity).await
    }

    async fn remove(&self, id: &str) -> JoinMeResult<()> {
        self.client
            .call(DeleteDocument {
                collection: T::COLLECTION.to_string(),
                id: id.to_string(),
            })
            .await
    }

    fn new_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JoinMeError;
    use crate::group::Group;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn repo() -> (Arc<MemoryStore>, RemoteRepository<Group>) {
        let store = Arc::new(MemoryStore::new());
        let repo = RemoteRepository::new(StoreClient::new(store.clone()));
        (store, repo)
    }

    #[tokio::test]
    async fn test_add_get_remove() {
        let (_store, repo) = repo();
        let group = Group::new("g1", "Runners", "owner");

        repo.add(group.clone()).await.unwrap();
        assert_eq!(repo.get("g1").await.unwrap(), Some(group));

        repo.remove("g1").await.unwrap();
        assert!(repo.get("g1").await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_tolerates_extra_fields() {
        let (store, repo) = repo();
        store
            .insert(
                "groups",
                Document {
                    id: "g7".to_string(),
                    fields: serde_json::json!({
                        "name": "Chess",
                        "owner_id": "u1",
                        "category": "GAMES",
                        "photo_url": null
                    }),
                },
            )
            .await;

        let groups = repo.list().await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "g7");
        assert_eq!(groups[0].name, "Chess");
        assert!(groups[0].member_ids.is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_propagates_unchanged() {
        let (store, repo) = repo();
        store.fail_with("deadline exceeded").await;

        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, JoinMeError::Remote(msg) if msg == "deadline exceeded"));
    }

    #[test]
    fn test_new_id_is_unique() {
        let (_store, repo) = repo();
        assert_ne!(repo.new_id(), repo.new_id());
    }
}
