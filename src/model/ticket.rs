use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;
use super::Priority;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn is_open(self) -> bool { matches!(self, Self::Open | Self::InProgress) }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    #[default]
    General,
    Billing,
    Maintenance,
    Complaint,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketResponse {
    pub responder_id: String,
    pub responder_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub ticket_id: String,
    pub user_id: String,
    pub subject: String,
    pub message: String,
    pub category: TicketCategory,
    pub status: TicketStatus,
    pub priority: Priority,
    #[serde(default)]
    pub responses: Vec<TicketResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for SupportTicket {
    const COLLECTION: &'static str = "support_tickets";
    fn id(&self) -> &str { &self.ticket_id }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportTicketCreate {
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub category: TicketCategory,
    #[serde(default)]
    pub priority: Priority,
}

impl SupportTicketCreate {
    pub fn into_ticket(self, user_id: &str) -> SupportTicket {
        let now = Utc::now();
        SupportTicket {
            ticket_id: super::new_id("ticket"),
            user_id: user_id.to_string(),
            subject: self.subject,
            message: self.message,
            category: self.category,
            status: TicketStatus::Open,
            priority: self.priority,
            responses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
