use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInboundRequest {
    pub phone: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRequest {
    pub contact_id: Uuid,
    /// The operator confirming the match, when known.
    pub operator_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContactFromMessageRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub operator_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListQuery {
    pub status: Option<crate::shared::models::MessageStatus>,
}
