//! Groups of users organising events together.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Entity;
use crate::error::{JoinMeError, JoinMeResult};
use crate::repository::Repository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

impl Entity for Group {
    const COLLECTION: &'static str = "groups";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Group {
    pub fn new(id: &str, name: &str, owner_id: &str) -> Self {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            description: String::new(),
            member_ids: vec![owner_id.to_string()],
        }
    }

    pub fn remove_member(&mut self, user_id: &str) -> JoinMeResult<()> {
        let before = self.member_ids.len();
        self.member_ids.retain(|m| m != user_id);

        if self.member_ids.len() == before {
            return Err(JoinMeError::NotParticipant {
                id: self.id.clone(),
                user: user_id.to_string(),
            });
        }
        Ok(())
    }
}

/// Drop `user_id` from a group's members and write the full record back.
pub async fn leave_group(
    repo: &dyn Repository<Group>,
    group_id: &str,
    user_id: &str,
) -> JoinMeResult<Group> {
    let mut group = repo
        .get(group_id)
        .await?
        .ok_or_else(|| JoinMeError::not_found(Group::COLLECTION, group_id))?;

    group.remove_member(user_id)?;
    repo.edit(group_id, group.clone()).await?;

    debug!(group_id, user_id, "left group");
    Ok(group)
}
