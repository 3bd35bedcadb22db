use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub announcement_id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub priority: Priority,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Announcement {
    const COLLECTION: &'static str = "announcements";
    fn id(&self) -> &str { &self.announcement_id }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementCreate {
    pub title: String,
    pub content: String,
    /// Defaults to the posting admin.
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl AnnouncementCreate {
    pub fn into_announcement(self, posted_by: &str) -> Announcement {
        Announcement {
            announcement_id: super::new_id("ann"),
            title: self.title,
            content: self.content,
            author_id: self.author_id.unwrap_or_else(|| posted_by.to_string()),
            priority: self.priority,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
