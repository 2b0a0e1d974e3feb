use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One message in a patient's portal thread.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PortalMessage {
    pub id: Uuid,
    /// Threads are keyed by patient.
    pub patient_id: Uuid,
    pub author_role: AuthorRole,
    pub author_name: String,
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub sent_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AuthorRole {
    Staff,
    Patient,
}

/// Messages sent strictly after `since`, oldest first.
pub fn since(mut messages: Vec<PortalMessage>, since: Option<jiff::Timestamp>) -> Vec<PortalMessage> {
    if let Some(since) = since {
        messages.retain(|m| m.sent_at > since);
    }
    messages.sort_by_key(|m| m.sent_at);
    messages
}
