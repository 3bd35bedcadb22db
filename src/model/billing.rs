use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub billing_id: String,
    pub user_id: String,
    #[serde(default)]
    pub assignment_id: Option<String>,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: BillingStatus,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Document for Billing {
    const COLLECTION: &'static str = "billing";
    fn id(&self) -> &str { &self.billing_id }
}

fn default_description() -> String { "Monthly Rent".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct BillingCreate {
    pub user_id: String,
    #[serde(default)]
    pub assignment_id: Option<String>,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    #[serde(default = "default_description")]
    pub description: String,
}

impl BillingCreate {
    pub fn into_billing(self) -> Billing {
        Billing {
            billing_id: super::new_id("bill"),
            user_id: self.user_id,
            assignment_id: self.assignment_id,
            amount: self.amount,
            due_date: self.due_date,
            status: BillingStatus::Pending,
            payment_date: None,
            payment_method: None,
            description: self.description,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingUpdate {
    pub status: Option<BillingStatus>,
    pub payment_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
}

impl BillingUpdate {
    /// Marking a bill paid without a payment date stamps `now`.
    pub fn apply(self, bill: &mut Billing, now: DateTime<Utc>) {
        if let Some(v) = self.payment_date { bill.payment_date = Some(v); }
        if let Some(v) = self.payment_method { bill.payment_method = Some(v); }
        if let Some(status) = self.status {
            bill.status = status;
            if status == BillingStatus::Paid && bill.payment_date.is_none() {
                bill.payment_date = Some(now);
            }
        }
    }
}
