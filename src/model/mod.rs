//! Document types stored by dormhub, one module per collection.

mod user;
mod room;
mod assignment;
mod billing;
mod maintenance;
mod announcement;
mod ticket;
mod faq;
mod session;

pub use user::{Role, User, UserUpdate};
pub use room::{Room, RoomCreate, RoomStatus, RoomUpdate};
pub use assignment::{AssignmentStatus, RoomAssignment, RoomAssignmentCreate};
pub use billing::{Billing, BillingCreate, BillingStatus, BillingUpdate};
pub use maintenance::{MaintenanceCreate, MaintenanceRequest, MaintenanceStatus, MaintenanceUpdate, Urgency};
pub use announcement::{Announcement, AnnouncementCreate, Priority};
pub use ticket::{SupportTicket, SupportTicketCreate, TicketCategory, TicketResponse, TicketStatus};
pub use faq::{Faq, FaqCreate};
pub use session::UserSession;

/// Generate an opaque document id: `<prefix>_<12 hex chars>`.
pub fn new_id(prefix: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..12])
}
