//! Core library for JoinMe.
//!
//! - `Event` and `Group` entities and the event lifecycle classifier
//! - `Repository` with a remote (document store) and a local (mirror) variant
//! - `sync` for replace-on-refresh mirroring, `view_state` for UI-facing lists
//! - `notify` for reminders and `deep_link` for `joinme://event/{id}` links

pub mod config;
pub mod context;
pub mod deep_link;
pub mod entity;
pub mod error;
pub mod event;
pub mod group;
pub mod history;
pub mod lifecycle;
pub mod notify;
pub mod repository;
pub mod store;
pub mod sync;
pub mod view_state;

pub use config::JoinMeConfig;
pub use context::AppContext;
pub use entity::Entity;
pub use error::{JoinMeError, JoinMeResult};
pub use event::{Event, EventType, Location, Visibility};
pub use group::Group;
pub use lifecycle::EventLifecycle;
pub use repository::Repository;
