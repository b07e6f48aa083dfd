use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::Group;
use crate::store::CrmStore;

/// Named, colored tags over contacts. Unlike lists, groups are always
/// static and always materialized, and keep a cached `player_count`
/// refreshed on every mutation.
pub struct GroupService {
    store: Arc<dyn CrmStore>,
}

impl GroupService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn create_group(&self, req: CreateGroupRequest) -> Result<Group, CrmError> {
        if req.name.trim().is_empty() {
            return Err(CrmError::Validation("group name is required".into()));
        }
        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            color: req.color,
            player_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_group(group).await
    }

    pub async fn get_group(&self, id: Uuid) -> Result<Group, CrmError> {
        self.store.get_group(id).await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>, CrmError> {
        self.store.list_groups().await
    }

    pub async fn add_to_group(
        &self,
        group_id: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<GroupMutationResult, CrmError> {
        self.store.get_group(group_id).await?;
        let mut missing = Vec::new();
        for contact_id in contact_ids {
            if self.store.get_contact(*contact_id).await.is_err() {
                missing.push(contact_id.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(CrmError::NotFound(format!(
                "unknown contacts: {}",
                missing.join(", ")
            )));
        }
        let mut affected = 0;
        for contact_id in contact_ids {
            if self.store.add_group_member(group_id, *contact_id).await? {
                affected += 1;
            }
        }
        let player_count = self.refresh_count(group_id).await?;
        Ok(GroupMutationResult {
            affected,
            player_count,
        })
    }

    pub async fn remove_from_group(
        &self,
        group_id: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<GroupMutationResult, CrmError> {
        self.store.get_group(group_id).await?;
        let mut affected = 0;
        for contact_id in contact_ids {
            if self
                .store
                .remove_group_member(group_id, *contact_id)
                .await?
            {
                affected += 1;
            }
        }
        let player_count = self.refresh_count(group_id).await?;
        Ok(GroupMutationResult {
            affected,
            player_count,
        })
    }

    pub async fn delete_group(&self, group_id: Uuid) -> Result<(), CrmError> {
        self.store.get_group(group_id).await?;
        self.store.clear_group_members(group_id).await?;
        self.store.delete_group(group_id).await
    }

    async fn refresh_count(&self, group_id: Uuid) -> Result<i32, CrmError> {
        let count = self.store.group_members(group_id).await?.len() as i32;
        let mut group = self.store.get_group(group_id).await?;
        group.player_count = count;
        group.updated_at = Utc::now();
        self.store.update_group(group).await?;
        Ok(count)
    }
}
