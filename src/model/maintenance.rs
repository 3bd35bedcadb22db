use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    /// Still waiting on staff.
    pub fn is_active(self) -> bool { matches!(self, Self::Pending | Self::InProgress) }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub request_id: String,
    pub user_id: String,
    /// Electrical, Plumbing, AC, Door Lock, Other
    pub request_type: String,
    pub description: String,
    pub urgency: Urgency,
    pub status: MaintenanceStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Document for MaintenanceRequest {
    const COLLECTION: &'static str = "maintenance_requests";
    fn id(&self) -> &str { &self.request_id }
}

/// Body of a new request. Any `user_id` a client sends is ignored; the
/// caller's id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceCreate {
    pub request_type: String,
    pub description: String,
    #[serde(default)]
    pub urgency: Urgency,
}

impl MaintenanceCreate {
    pub fn into_request(self, user_id: &str) -> MaintenanceRequest {
        MaintenanceRequest {
            request_id: super::new_id("maint"),
            user_id: user_id.to_string(),
            request_type: self.request_type,
            description: self.description,
            urgency: self.urgency,
            status: MaintenanceStatus::Pending,
            assigned_to: None,
            notes: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceUpdate {
    pub status: Option<MaintenanceStatus>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
}

impl MaintenanceUpdate {
    pub fn apply(self, req: &mut MaintenanceRequest, now: DateTime<Utc>) {
        if let Some(v) = self.assigned_to { req.assigned_to = Some(v); }
        if let Some(v) = self.notes { req.notes = Some(v); }
        if let Some(status) = self.status {
            req.status = status;
            if status == MaintenanceStatus::Completed {
                req.completed_at = Some(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_stamps_completed_at() {
        let mut req = MaintenanceCreate { request_type: "AC".into(), description: "warm air".into(), urgency: Urgency::High }
            .into_request("u1");
        let now = Utc::now();
        MaintenanceUpdate { status: Some(MaintenanceStatus::InProgress), assigned_to: Some("tech".into()), notes: None }
            .apply(&mut req, now);
        assert!(req.completed_at.is_none());
        assert!(req.status.is_active());
        MaintenanceUpdate { status: Some(MaintenanceStatus::Completed), ..Default::default() }.apply(&mut req, now);
        assert_eq!(req.completed_at, Some(now));
        assert_eq!(req.assigned_to.as_deref(), Some("tech"));
        assert!(!req.status.is_active());
    }

    #[test]
    fn urgency_and_status_use_snake_case() {
        let req: MaintenanceRequest = serde_json::from_value(serde_json::json!({
            "request_id": "maint_1", "user_id": "u1", "request_type": "Door Lock", "description": "stuck",
            "urgency": "emergency", "status": "in_progress", "created_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(req.urgency, Urgency::Emergency);
        assert_eq!(req.status, MaintenanceStatus::InProgress);
    }
}
