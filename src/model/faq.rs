use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub faq_id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Faq {
    const COLLECTION: &'static str = "faqs";
    fn id(&self) -> &str { &self.faq_id }
}

fn default_category() -> String { "general".to_string() }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct FaqCreate {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl FaqCreate {
    pub fn into_faq(self) -> Faq {
        Faq {
            faq_id: super::new_id("faq"),
            question: self.question,
            answer: self.answer,
            category: self.category,
            order: self.order,
            is_active: self.is_active,
            created_at: Utc::now(),
        }
    }
}
