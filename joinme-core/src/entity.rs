//! Records persisted in the remote store and mirrored locally.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record keyed by a string id and scoped to one remote collection.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name of the remote collection holding this kind of record.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}
