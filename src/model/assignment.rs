use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Active,
    Expired,
    Cancelled,
}

/// Links a user to a room for a stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub assignment_id: String,
    pub user_id: String,
    pub room_id: String,
    pub move_in_date: DateTime<Utc>,
    pub move_out_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Document for RoomAssignment {
    const COLLECTION: &'static str = "room_assignments";
    fn id(&self) -> &str { &self.assignment_id }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomAssignmentCreate {
    pub user_id: String,
    pub room_id: String,
    pub move_in_date: DateTime<Utc>,
    pub move_out_date: DateTime<Utc>,
}

impl RoomAssignmentCreate {
    pub fn into_assignment(self) -> RoomAssignment {
        RoomAssignment {
            assignment_id: super::new_id("assign"),
            user_id: self.user_id,
            room_id: self.room_id,
            move_in_date: self.move_in_date,
            move_out_date: self.move_out_date,
            status: AssignmentStatus::Active,
            created_at: Utc::now(),
        }
    }
}
