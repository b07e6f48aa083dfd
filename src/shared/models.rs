use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::utils::normalize_phone;

/// A prospective player tracked by the agency. `status` is a free-text
/// stage label ("New", "Contacted", "In pipeline", "Signed", ...) owned
/// by whichever workflow last touched the contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub program_id: Option<Uuid>,
    pub recruiter_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a contact. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub program_id: Option<Uuid>,
    pub recruiter_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: Uuid,
    pub pipeline_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub stage_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Denormalized contact fields carried on a deal so board views render
/// without a join. Rebuilt whenever the deal is (re)created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSnapshot {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactSnapshot {
    pub fn of(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        }
    }
}

/// A contact placed into one stage of one pipeline. `won` is `None`
/// while the deal is open and records the outcome once it exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: Uuid,
    pub pipeline_id: Uuid,
    pub stage_id: Uuid,
    pub contact_id: Uuid,
    pub recruiter_id: Option<Uuid>,
    pub value: Option<f64>,
    pub contact_snapshot: ContactSnapshot,
    pub won: Option<bool>,
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Static,
    Smart,
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Smart => write!(f, "smart"),
        }
    }
}

/// Fields a smart-list rule may target. A closed enum so unsupported
/// fields are rejected when the filter is deserialized, not when it is
/// evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Name,
    Email,
    Phone,
    Status,
    Program,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Equals,
    Contains,
}

/// One smart-list criterion. Rules on a list combine with logical AND.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRule {
    pub field: FilterField,
    pub op: FilterOp,
    pub value: String,
}

impl FilterRule {
    pub fn matches(&self, contact: &Contact) -> bool {
        let actual = match self.field {
            FilterField::Name => Some(contact.name.clone()),
            FilterField::Email => contact.email.clone(),
            FilterField::Phone => contact.phone.clone(),
            FilterField::Status => Some(contact.status.clone()),
            FilterField::Program => contact.program_id.map(|id| id.to_string()),
        };
        let Some(actual) = actual else {
            return false;
        };
        // Phone comparison is digits-only so formatting differences
        // ("+44 7700 900123" vs "07700900123") don't break the rule.
        let (actual, wanted) = if self.field == FilterField::Phone {
            (normalize_phone(&actual), normalize_phone(&self.value))
        } else {
            (actual.to_lowercase(), self.value.to_lowercase())
        };
        match self.op {
            FilterOp::Equals => actual == wanted,
            FilterOp::Contains => actual.contains(&wanted),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactList {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub kind: ListKind,
    /// Empty for static lists; non-empty for smart lists.
    pub filter: Vec<FilterRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    /// Cached membership count, recomputed on every mutation.
    pub player_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Unmatched,
    Matched,
    Spam,
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmatched => write!(f, "unmatched"),
            Self::Matched => write!(f, "matched"),
            Self::Spam => write!(f, "spam"),
        }
    }
}

/// An inbound SMS reply awaiting (or holding) a match decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: Uuid,
    pub phone: String,
    pub text: String,
    pub status: MessageStatus,
    pub lead_id: Option<Uuid>,
    pub matched_at: Option<DateTime<Utc>>,
    pub matched_by: Option<Uuid>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    SmsReply,
    Note,
    StatusChange,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SmsReply => write!(f, "sms_reply"),
            Self::Note => write!(f, "note"),
            Self::StatusChange => write!(f, "status_change"),
        }
    }
}

/// Append-only audit-trail entry. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub activity_type: ActivityType,
    pub description: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
