mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::CrmError;
use crate::shared::models::{
    Activity, Contact, ContactList, ContactPatch, Deal, FilterRule, Group, InboundMessage,
    MessageStatus, Pipeline, Stage,
};

/// Which fields contacts come back ordered by.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactOrder {
    #[default]
    CreatedDesc,
    NameAsc,
}

/// Filter + pagination + ordering for a contact query. `rules` narrow
/// by AND-combined criteria; `search` matches name/email/phone as a
/// case-insensitive substring (digits-only for phone).
#[derive(Debug, Clone, Default)]
pub struct ContactQuery {
    pub rules: Vec<FilterRule>,
    pub search: Option<String>,
    pub order: ContactOrder,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// The persistence contract the engines run against. The production
/// store lives behind this boundary; tests run the bundled
/// [`MemoryStore`] through the identical interface.
///
/// Multi-row operations are issued by the engines as sequential calls;
/// atomicity beyond a single call is the store's concern, not assumed
/// here.
#[async_trait]
pub trait CrmStore: Send + Sync {
    // --- contacts ---
    async fn find_contacts(&self, query: ContactQuery) -> Result<(Vec<Contact>, usize), CrmError>;
    async fn get_contact(&self, id: Uuid) -> Result<Contact, CrmError>;
    async fn insert_contact(&self, contact: Contact) -> Result<Contact, CrmError>;
    async fn update_contact(&self, id: Uuid, patch: ContactPatch) -> Result<Contact, CrmError>;
    async fn delete_contact(&self, id: Uuid) -> Result<(), CrmError>;

    // --- pipelines ---
    async fn insert_pipeline(&self, pipeline: Pipeline) -> Result<Pipeline, CrmError>;
    async fn get_pipeline(&self, id: Uuid) -> Result<Pipeline, CrmError>;
    async fn list_pipelines(&self) -> Result<Vec<Pipeline>, CrmError>;
    async fn delete_pipeline(&self, id: Uuid) -> Result<(), CrmError>;

    // --- stages ---
    async fn insert_stage(&self, stage: Stage) -> Result<Stage, CrmError>;
    async fn get_stage(&self, id: Uuid) -> Result<Stage, CrmError>;
    async fn update_stage(&self, stage: Stage) -> Result<Stage, CrmError>;
    async fn delete_stage(&self, id: Uuid) -> Result<(), CrmError>;
    /// Stages of a pipeline, ordered by `stage_order` ascending.
    async fn list_stages(&self, pipeline_id: Uuid) -> Result<Vec<Stage>, CrmError>;

    // --- deals ---
    async fn insert_deal(&self, deal: Deal) -> Result<Deal, CrmError>;
    async fn get_deal(&self, id: Uuid) -> Result<Deal, CrmError>;
    async fn update_deal(&self, deal: Deal) -> Result<Deal, CrmError>;
    async fn delete_deal(&self, id: Uuid) -> Result<(), CrmError>;
    async fn list_deals_by_stage(&self, stage_id: Uuid) -> Result<Vec<Deal>, CrmError>;
    async fn list_deals_by_pipeline(&self, pipeline_id: Uuid) -> Result<Vec<Deal>, CrmError>;

    // --- lists & membership ---
    async fn insert_list(&self, list: ContactList) -> Result<ContactList, CrmError>;
    async fn get_list(&self, id: Uuid) -> Result<ContactList, CrmError>;
    async fn list_lists(&self) -> Result<Vec<ContactList>, CrmError>;
    async fn delete_list(&self, id: Uuid) -> Result<(), CrmError>;
    async fn list_members(&self, list_id: Uuid) -> Result<Vec<Uuid>, CrmError>;
    /// Returns true when a row was actually inserted (false: already a member).
    async fn add_member(&self, list_id: Uuid, contact_id: Uuid) -> Result<bool, CrmError>;
    /// Returns true when a row was actually removed.
    async fn remove_member(&self, list_id: Uuid, contact_id: Uuid) -> Result<bool, CrmError>;
    async fn clear_members(&self, list_id: Uuid) -> Result<usize, CrmError>;

    // --- groups & membership ---
    async fn insert_group(&self, group: Group) -> Result<Group, CrmError>;
    async fn get_group(&self, id: Uuid) -> Result<Group, CrmError>;
    async fn update_group(&self, group: Group) -> Result<Group, CrmError>;
    async fn list_groups(&self) -> Result<Vec<Group>, CrmError>;
    async fn delete_group(&self, id: Uuid) -> Result<(), CrmError>;
    async fn group_members(&self, group_id: Uuid) -> Result<Vec<Uuid>, CrmError>;
    async fn add_group_member(&self, group_id: Uuid, contact_id: Uuid) -> Result<bool, CrmError>;
    async fn remove_group_member(&self, group_id: Uuid, contact_id: Uuid)
        -> Result<bool, CrmError>;
    async fn clear_group_members(&self, group_id: Uuid) -> Result<usize, CrmError>;

    // --- inbound messages ---
    async fn insert_message(&self, message: InboundMessage) -> Result<InboundMessage, CrmError>;
    async fn get_message(&self, id: Uuid) -> Result<InboundMessage, CrmError>;
    async fn update_message(&self, message: InboundMessage) -> Result<InboundMessage, CrmError>;
    async fn list_messages(
        &self,
        status: Option<MessageStatus>,
    ) -> Result<Vec<InboundMessage>, CrmError>;

    // --- activities (append-only) ---
    async fn insert_activity(&self, activity: Activity) -> Result<Activity, CrmError>;
    async fn list_activities(&self, contact_id: Uuid) -> Result<Vec<Activity>, CrmError>;
}
