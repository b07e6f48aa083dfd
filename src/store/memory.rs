use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::error::CrmError;
use crate::shared::models::{
    Activity, Contact, ContactList, ContactPatch, Deal, Group, InboundMessage, MessageStatus,
    Pipeline, Stage,
};
use crate::shared::utils::normalize_phone;
use crate::store::{ContactOrder, ContactQuery, CrmStore};

#[derive(Default)]
struct Inner {
    contacts: HashMap<Uuid, Contact>,
    pipelines: HashMap<Uuid, Pipeline>,
    stages: HashMap<Uuid, Stage>,
    deals: HashMap<Uuid, Deal>,
    lists: HashMap<Uuid, ContactList>,
    list_members: HashMap<Uuid, Vec<Uuid>>,
    groups: HashMap<Uuid, Group>,
    group_members: HashMap<Uuid, Vec<Uuid>>,
    messages: HashMap<Uuid, InboundMessage>,
    activities: Vec<Activity>,
}

/// In-memory [`CrmStore`]. Backs dev runs and every test; production
/// deployments swap in a relational implementation of the same trait.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn search_matches(contact: &Contact, query: &str) -> bool {
    let needle = query.to_lowercase();
    if contact.name.to_lowercase().contains(&needle) {
        return true;
    }
    if let Some(email) = &contact.email {
        if email.to_lowercase().contains(&needle) {
            return true;
        }
    }
    if let Some(phone) = &contact.phone {
        if phone.to_lowercase().contains(&needle) {
            return true;
        }
        let digits = normalize_phone(query);
        if !digits.is_empty() && normalize_phone(phone).contains(&digits) {
            return true;
        }
    }
    false
}

#[async_trait]
impl CrmStore for MemoryStore {
    async fn find_contacts(&self, query: ContactQuery) -> Result<(Vec<Contact>, usize), CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Contact> = inner
            .contacts
            .values()
            .filter(|c| query.rules.iter().all(|r| r.matches(c)))
            .filter(|c| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |q| search_matches(c, q))
            })
            .cloned()
            .collect();
        match query.order {
            ContactOrder::CreatedDesc => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ContactOrder::NameAsc => rows.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        let total = rows.len();
        let offset = query.offset.unwrap_or(0).min(total);
        let mut rows = rows.split_off(offset);
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok((rows, total))
    }

    async fn get_contact(&self, id: Uuid) -> Result<Contact, CrmError> {
        self.inner
            .read()
            .await
            .contacts
            .get(&id)
            .cloned()
            .ok_or_else(|| CrmError::NotFound(format!("contact {id}")))
    }

    async fn insert_contact(&self, contact: Contact) -> Result<Contact, CrmError> {
        let mut inner = self.inner.write().await;
        inner.contacts.insert(contact.id, contact.clone());
        Ok(contact)
    }

    async fn update_contact(&self, id: Uuid, patch: ContactPatch) -> Result<Contact, CrmError> {
        let mut inner = self.inner.write().await;
        let contact = inner
            .contacts
            .get_mut(&id)
            .ok_or_else(|| CrmError::NotFound(format!("contact {id}")))?;
        if let Some(name) = patch.name {
            contact.name = name;
        }
        if let Some(email) = patch.email {
            contact.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            contact.phone = Some(phone);
        }
        if let Some(status) = patch.status {
            contact.status = status;
        }
        if let Some(notes) = patch.notes {
            contact.notes = Some(notes);
        }
        if let Some(program_id) = patch.program_id {
            contact.program_id = Some(program_id);
        }
        if let Some(recruiter_id) = patch.recruiter_id {
            contact.recruiter_id = Some(recruiter_id);
        }
        contact.updated_at = chrono::Utc::now();
        Ok(contact.clone())
    }

    async fn delete_contact(&self, id: Uuid) -> Result<(), CrmError> {
        let mut inner = self.inner.write().await;
        inner
            .contacts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CrmError::NotFound(format!("contact {id}")))
    }

    async fn insert_pipeline(&self, pipeline: Pipeline) -> Result<Pipeline, CrmError> {
        let mut inner = self.inner.write().await;
        inner.pipelines.insert(pipeline.id, pipeline.clone());
        Ok(pipeline)
    }

    async fn get_pipeline(&self, id: Uuid) -> Result<Pipeline, CrmError> {
        self.inner
            .read()
            .await
            .pipelines
            .get(&id)
            .cloned()
            .ok_or_else(|| CrmError::NotFound(format!("pipeline {id}")))
    }

    async fn list_pipelines(&self) -> Result<Vec<Pipeline>, CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Pipeline> = inner.pipelines.values().cloned().collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn delete_pipeline(&self, id: Uuid) -> Result<(), CrmError> {
        let mut inner = self.inner.write().await;
        inner
            .pipelines
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CrmError::NotFound(format!("pipeline {id}")))
    }

    async fn insert_stage(&self, stage: Stage) -> Result<Stage, CrmError> {
        let mut inner = self.inner.write().await;
        inner.stages.insert(stage.id, stage.clone());
        Ok(stage)
    }

    async fn get_stage(&self, id: Uuid) -> Result<Stage, CrmError> {
        self.inner
            .read()
            .await
            .stages
            .get(&id)
            .cloned()
            .ok_or_else(|| CrmError::NotFound(format!("stage {id}")))
    }

    async fn update_stage(&self, stage: Stage) -> Result<Stage, CrmError> {
        let mut inner = self.inner.write().await;
        if !inner.stages.contains_key(&stage.id) {
            return Err(CrmError::NotFound(format!("stage {}", stage.id)));
        }
        inner.stages.insert(stage.id, stage.clone());
        Ok(stage)
    }

    async fn delete_stage(&self, id: Uuid) -> Result<(), CrmError> {
        let mut inner = self.inner.write().await;
        inner
            .stages
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CrmError::NotFound(format!("stage {id}")))
    }

    async fn list_stages(&self, pipeline_id: Uuid) -> Result<Vec<Stage>, CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Stage> = inner
            .stages
            .values()
            .filter(|s| s.pipeline_id == pipeline_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.stage_order);
        Ok(rows)
    }

    async fn insert_deal(&self, deal: Deal) -> Result<Deal, CrmError> {
        let mut inner = self.inner.write().await;
        inner.deals.insert(deal.id, deal.clone());
        Ok(deal)
    }

    async fn get_deal(&self, id: Uuid) -> Result<Deal, CrmError> {
        self.inner
            .read()
            .await
            .deals
            .get(&id)
            .cloned()
            .ok_or_else(|| CrmError::NotFound(format!("deal {id}")))
    }

    async fn update_deal(&self, deal: Deal) -> Result<Deal, CrmError> {
        let mut inner = self.inner.write().await;
        if !inner.deals.contains_key(&deal.id) {
            return Err(CrmError::NotFound(format!("deal {}", deal.id)));
        }
        inner.deals.insert(deal.id, deal.clone());
        Ok(deal)
    }

    async fn delete_deal(&self, id: Uuid) -> Result<(), CrmError> {
        let mut inner = self.inner.write().await;
        inner
            .deals
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CrmError::NotFound(format!("deal {id}")))
    }

    async fn list_deals_by_stage(&self, stage_id: Uuid) -> Result<Vec<Deal>, CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Deal> = inner
            .deals
            .values()
            .filter(|d| d.stage_id == stage_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn list_deals_by_pipeline(&self, pipeline_id: Uuid) -> Result<Vec<Deal>, CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Deal> = inner
            .deals
            .values()
            .filter(|d| d.pipeline_id == pipeline_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn insert_list(&self, list: ContactList) -> Result<ContactList, CrmError> {
        let mut inner = self.inner.write().await;
        inner.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn get_list(&self, id: Uuid) -> Result<ContactList, CrmError> {
        self.inner
            .read()
            .await
            .lists
            .get(&id)
            .cloned()
            .ok_or_else(|| CrmError::NotFound(format!("list {id}")))
    }

    async fn list_lists(&self) -> Result<Vec<ContactList>, CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<ContactList> = inner.lists.values().cloned().collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn delete_list(&self, id: Uuid) -> Result<(), CrmError> {
        let mut inner = self.inner.write().await;
        inner
            .lists
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CrmError::NotFound(format!("list {id}")))
    }

    async fn list_members(&self, list_id: Uuid) -> Result<Vec<Uuid>, CrmError> {
        let inner = self.inner.read().await;
        Ok(inner.list_members.get(&list_id).cloned().unwrap_or_default())
    }

    async fn add_member(&self, list_id: Uuid, contact_id: Uuid) -> Result<bool, CrmError> {
        let mut inner = self.inner.write().await;
        let members = inner.list_members.entry(list_id).or_default();
        if members.contains(&contact_id) {
            return Ok(false);
        }
        members.push(contact_id);
        Ok(true)
    }

    async fn remove_member(&self, list_id: Uuid, contact_id: Uuid) -> Result<bool, CrmError> {
        let mut inner = self.inner.write().await;
        let Some(members) = inner.list_members.get_mut(&list_id) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|id| *id != contact_id);
        Ok(members.len() < before)
    }

    async fn clear_members(&self, list_id: Uuid) -> Result<usize, CrmError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .list_members
            .remove(&list_id)
            .map(|m| m.len())
            .unwrap_or(0))
    }

    async fn insert_group(&self, group: Group) -> Result<Group, CrmError> {
        let mut inner = self.inner.write().await;
        inner.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn get_group(&self, id: Uuid) -> Result<Group, CrmError> {
        self.inner
            .read()
            .await
            .groups
            .get(&id)
            .cloned()
            .ok_or_else(|| CrmError::NotFound(format!("group {id}")))
    }

    async fn update_group(&self, group: Group) -> Result<Group, CrmError> {
        let mut inner = self.inner.write().await;
        if !inner.groups.contains_key(&group.id) {
            return Err(CrmError::NotFound(format!("group {}", group.id)));
        }
        inner.groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Group> = inner.groups.values().cloned().collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn delete_group(&self, id: Uuid) -> Result<(), CrmError> {
        let mut inner = self.inner.write().await;
        inner
            .groups
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CrmError::NotFound(format!("group {id}")))
    }

    async fn group_members(&self, group_id: Uuid) -> Result<Vec<Uuid>, CrmError> {
        let inner = self.inner.read().await;
        Ok(inner
            .group_members
            .get(&group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_group_member(&self, group_id: Uuid, contact_id: Uuid) -> Result<bool, CrmError> {
        let mut inner = self.inner.write().await;
        let members = inner.group_members.entry(group_id).or_default();
        if members.contains(&contact_id) {
            return Ok(false);
        }
        members.push(contact_id);
        Ok(true)
    }

    async fn remove_group_member(
        &self,
        group_id: Uuid,
        contact_id: Uuid,
    ) -> Result<bool, CrmError> {
        let mut inner = self.inner.write().await;
        let Some(members) = inner.group_members.get_mut(&group_id) else {
            return Ok(false);
        };
        let before = members.len();
        members.retain(|id| *id != contact_id);
        Ok(members.len() < before)
    }

    async fn clear_group_members(&self, group_id: Uuid) -> Result<usize, CrmError> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .group_members
            .remove(&group_id)
            .map(|m| m.len())
            .unwrap_or(0))
    }

    async fn insert_message(&self, message: InboundMessage) -> Result<InboundMessage, CrmError> {
        let mut inner = self.inner.write().await;
        inner.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn get_message(&self, id: Uuid) -> Result<InboundMessage, CrmError> {
        self.inner
            .read()
            .await
            .messages
            .get(&id)
            .cloned()
            .ok_or_else(|| CrmError::NotFound(format!("message {id}")))
    }

    async fn update_message(&self, message: InboundMessage) -> Result<InboundMessage, CrmError> {
        let mut inner = self.inner.write().await;
        if !inner.messages.contains_key(&message.id) {
            return Err(CrmError::NotFound(format!("message {}", message.id)));
        }
        inner.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn list_messages(
        &self,
        status: Option<MessageStatus>,
    ) -> Result<Vec<InboundMessage>, CrmError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<InboundMessage> = inner
            .messages
            .values()
            .filter(|m| status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        Ok(rows)
    }

    async fn insert_activity(&self, activity: Activity) -> Result<Activity, CrmError> {
        let mut inner = self.inner.write().await;
        inner.activities.push(activity.clone());
        Ok(activity)
    }

    async fn list_activities(&self, contact_id: Uuid) -> Result<Vec<Activity>, CrmError> {
        let inner = self.inner.read().await;
        Ok(inner
            .activities
            .iter()
            .filter(|a| a.contact_id == contact_id)
            .cloned()
            .collect())
    }
}
