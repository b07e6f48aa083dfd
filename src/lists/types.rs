use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::models::{ContactList, FilterRule, ListKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListRequest {
    pub name: String,
    pub description: Option<String>,
    pub kind: ListKind,
    /// Required (non-empty) for smart lists; ignored for static ones.
    pub filter: Option<Vec<FilterRule>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembersRequest {
    pub contact_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMembersResult {
    pub added: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMembersResult {
    pub removed: usize,
}

/// A list plus its membership count. For static lists the count is the
/// stored membership rows; for smart lists it is evaluated live, so two
/// reads may disagree as contacts change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListView {
    #[serde(flatten)]
    pub list: ContactList,
    pub contact_count: usize,
}
