//! Activity events.
//!
//! An event is replaced as a whole on every write; there is no partial-field
//! update. Participant capacity is not enforced by repositories: callers that
//! care use the checked helpers below.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Entity;
use crate::error::{JoinMeError, JoinMeResult};
use crate::lifecycle::{EventLifecycle, classify};
use crate::repository::Repository;

/// A spontaneous activity users can discover and join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Location>,
    /// Start instant
    pub date: DateTime<Utc>,
    /// Length in minutes
    pub duration: u32,
    /// User ids; uniqueness is kept by the checked helpers, not by the type
    #[serde(default)]
    pub participants: Vec<String>,
    pub max_participants: u32,
    pub visibility: Visibility,
    pub owner_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Sports,
    Activity,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

impl Entity for Event {
    const COLLECTION: &'static str = "events";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Event {
    pub fn end(&self) -> DateTime<Utc> {
        self.date + Duration::minutes(i64::from(self.duration))
    }

    pub fn lifecycle(&self, now: DateTime<Utc>) -> EventLifecycle {
        classify(now, self.date, self.duration)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p == user_id)
    }

    pub fn add_participant(&mut self, user_id: &str) -> JoinMeResult<()> {
        if self.has_participant(user_id) {
            return Err(JoinMeError::AlreadyParticipant {
                id: self.id.clone(),
                user: user_id.to_string(),
            });
        }
        if self.is_full() {
            return Err(JoinMeError::EventFull(self.id.clone()));
        }
        self.participants.push(user_id.to_string());
        Ok(())
    }

    pub fn remove_participant(&mut self, user_id: &str) -> JoinMeResult<()> {
        let before = self.participants.len();
        self.participants.retain(|p| p != user_id);

        if self.participants.len() == before {
            return Err(JoinMeError::NotParticipant {
                id: self.id.clone(),
                user: user_id.to_string(),
            });
        }
        Ok(())
    }
}

/// Add `user_id` to an event and write the full record back.
pub async fn join_event(
    repo: &dyn Repository<Event>,
    event_id: &str,
    user_id: &str,
) -> JoinMeResult<Event> {
    let mut event = repo
        .get(event_id)
        .await?
        .ok_or_else(|| JoinMeError::not_found(Event::COLLECTION, event_id))?;

    event.add_participant(user_id)?;
    repo.edit(event_id, event.clone()).await?;

    debug!(event_id, user_id, "joined event");
    Ok(event)
}

/// Remove `user_id` from an event and write the full record back.
pub async fn quit_event(
    repo: &dyn Repository<Event>,
    event_id: &str,
    user_id: &str,
) -> JoinMeResult<Event> {
    let mut event = repo
        .get(event_id)
        .await?
        .ok_or_else(|| JoinMeError::not_found(Event::COLLECTION, event_id))?;

    event.remove_participant(user_id)?;
    repo.edit(event_id, event.clone()).await?;

    debug!(event_id, user_id, "quit event");
    Ok(event)
}

#[cfg(test)]
pub(crate) fn test_event(id: &str, date: DateTime<Utc>, duration: u32) -> Event {
    Event {
        id: id.to_string(),
        event_type: EventType::Sports,
        title: format!("Event {id}"),
        description: String::new(),
        location: None,
        date,
        duration,
        participants: vec![],
        max_participants: 2,
        visibility: Visibility::Public,
        owner_id: "owner".to_string(),
    }
}
