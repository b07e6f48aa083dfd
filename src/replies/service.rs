use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::types::*;
use crate::shared::error::CrmError;
use crate::shared::models::{
    Activity, ActivityType, Contact, InboundMessage, MessageStatus,
};
use crate::shared::utils::{normalize_phone, summarize};
use crate::store::{ContactQuery, CrmStore};

/// How much of the message text ends up in the activity trail.
const ACTIVITY_SUMMARY_LEN: usize = 50;

/// Links inbound SMS replies to known contacts. The engine only ranks
/// candidates; an operator decision (link / create / spam) is what
/// changes a message's status.
pub struct ReplyService {
    store: Arc<dyn CrmStore>,
}

impl ReplyService {
    pub fn new(store: Arc<dyn CrmStore>) -> Self {
        Self { store }
    }

    pub async fn record_inbound(
        &self,
        req: RecordInboundRequest,
    ) -> Result<InboundMessage, CrmError> {
        if req.phone.trim().is_empty() {
            return Err(CrmError::Validation("phone is required".into()));
        }
        let message = InboundMessage {
            id: Uuid::new_v4(),
            phone: req.phone,
            text: req.text,
            status: MessageStatus::Unmatched,
            lead_id: None,
            matched_at: None,
            matched_by: None,
            received_at: Utc::now(),
        };
        self.store.insert_message(message).await
    }

    pub async fn list_messages(
        &self,
        status: Option<MessageStatus>,
    ) -> Result<Vec<InboundMessage>, CrmError> {
        self.store.list_messages(status).await
    }

    /// Candidate contacts for a free-text query, best match first.
    /// Exact field equality (case-insensitive; digits-only for phone)
    /// ranks above substring containment. An empty result is a valid
    /// answer, not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<Contact>, CrmError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let (rows, _) = self
            .store
            .find_contacts(ContactQuery {
                search: Some(query.to_string()),
                ..Default::default()
            })
            .await?;
        let mut ranked: Vec<(u8, Contact)> = rows
            .into_iter()
            .map(|c| (match_rank(&c, query), c))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(&b.1.name)));
        Ok(ranked.into_iter().map(|(_, c)| c).collect())
    }

    /// Operator confirmed a match: the message becomes `matched` and
    /// exactly one activity row summarizing the text lands on the
    /// contact's trail. This is the engine's only activity writer.
    pub async fn link_to_contact(
        &self,
        message_id: Uuid,
        contact_id: Uuid,
        operator_id: Option<Uuid>,
    ) -> Result<InboundMessage, CrmError> {
        let message = self.store.get_message(message_id).await?;
        if message.status != MessageStatus::Unmatched {
            return Err(CrmError::Conflict(format!(
                "message is already {}",
                message.status
            )));
        }
        let contact = self.store.get_contact(contact_id).await?;
        info!(contact = %contact.name, "linking inbound message");
        self.finish_link(message, &contact, operator_id).await
    }

    /// No existing contact fits: create one from the message and link
    /// it in the same step. Name and phone are mandatory.
    pub async fn create_contact_from_message(
        &self,
        message_id: Uuid,
        req: CreateContactFromMessageRequest,
    ) -> Result<(Contact, InboundMessage), CrmError> {
        if req.name.trim().is_empty() || req.phone.trim().is_empty() {
            return Err(CrmError::Validation("name and phone are required".into()));
        }
        let message = self.store.get_message(message_id).await?;
        if message.status != MessageStatus::Unmatched {
            return Err(CrmError::Conflict(format!(
                "message is already {}",
                message.status
            )));
        }
        let now = Utc::now();
        let contact = self
            .store
            .insert_contact(Contact {
                id: Uuid::new_v4(),
                name: req.name,
                email: req.email,
                phone: Some(req.phone),
                status: "New".into(),
                notes: None,
                program_id: None,
                recruiter_id: None,
                created_at: now,
                updated_at: now,
            })
            .await?;
        let message = self
            .finish_link(message, &contact, req.operator_id)
            .await?;
        Ok((contact, message))
    }

    pub async fn mark_spam(&self, message_id: Uuid) -> Result<InboundMessage, CrmError> {
        let mut message = self.store.get_message(message_id).await?;
        if message.status == MessageStatus::Matched {
            return Err(CrmError::Conflict(
                "matched message must be restored before marking spam".into(),
            ));
        }
        message.status = MessageStatus::Spam;
        self.store.update_message(message).await
    }

    /// Returns a matched or spam message to the unmatched pool and
    /// clears the link fields. Restoring an unmatched message is a
    /// no-op.
    pub async fn restore(&self, message_id: Uuid) -> Result<InboundMessage, CrmError> {
        let mut message = self.store.get_message(message_id).await?;
        if message.status == MessageStatus::Unmatched {
            return Ok(message);
        }
        message.status = MessageStatus::Unmatched;
        message.lead_id = None;
        message.matched_at = None;
        message.matched_by = None;
        self.store.update_message(message).await
    }

    pub async fn list_activities(&self, contact_id: Uuid) -> Result<Vec<Activity>, CrmError> {
        self.store.get_contact(contact_id).await?;
        self.store.list_activities(contact_id).await
    }

    async fn finish_link(
        &self,
        mut message: InboundMessage,
        contact: &Contact,
        operator_id: Option<Uuid>,
    ) -> Result<InboundMessage, CrmError> {
        let now = Utc::now();
        message.status = MessageStatus::Matched;
        message.lead_id = Some(contact.id);
        message.matched_at = Some(now);
        message.matched_by = operator_id;
        let message = self.store.update_message(message).await?;
        self.store
            .insert_activity(Activity {
                id: Uuid::new_v4(),
                contact_id: contact.id,
                activity_type: ActivityType::SmsReply,
                description: summarize(&message.text, ACTIVITY_SUMMARY_LEN),
                metadata: serde_json::json!({
                    "message_id": message.id,
                    "phone": message.phone,
                }),
                created_at: now,
            })
            .await?;
        Ok(message)
    }
}

fn match_rank(contact: &Contact, query: &str) -> u8 {
    if contact.name.eq_ignore_ascii_case(query) {
        return 0;
    }
    if let Some(email) = &contact.email {
        if email.eq_ignore_ascii_case(query) {
            return 0;
        }
    }
    if let Some(phone) = &contact.phone {
        let digits = normalize_phone(query);
        if !digits.is_empty() && normalize_phone(phone) == digits {
            return 0;
        }
    }
    1
}
