//! Sample rooms, announcements and FAQs for development runs.
//!
//! Fixtures carry fixed ids, so seeding twice inserts nothing new.

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::model::{Announcement, Faq, Priority, Room, RoomStatus};
use crate::storage::{Document, SharedStore, Store};

fn room(id: &str, number: &str, room_type: &str, bed: &str, floor: i32, status: RoomStatus, price: f64, amenities: &[&str], description: &str) -> Room {
    Room {
        room_id: id.to_string(),
        room_number: number.to_string(),
        room_type: room_type.to_string(),
        bed_type: bed.to_string(),
        capacity: if bed == "Double" { 2 } else { 1 },
        floor,
        status,
        price,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        images: Vec::new(),
        description: Some(description.to_string()),
        created_at: Utc::now(),
    }
}

fn sample_rooms() -> Vec<Room> {
    vec![
        room("room_001", "101", "Standard", "Single", 1, RoomStatus::Available, 8000.0,
            &["WiFi", "Air Conditioning", "Private Bathroom"], "Ground floor standard room."),
        room("room_002", "102", "Standard", "Single", 1, RoomStatus::Available, 8000.0,
            &["WiFi", "Air Conditioning", "Shared Bathroom"], "Standard room next to the shared bathroom."),
        room("room_003", "201", "Standard", "Single", 2, RoomStatus::Occupied, 8000.0,
            &["WiFi", "Air Conditioning", "Private Bathroom"], "Second floor standard room."),
        room("room_004", "202", "Deluxe", "Double", 2, RoomStatus::Available, 12000.0,
            &["WiFi", "Air Conditioning", "Private Bathroom", "Mini Fridge", "TV"], "Larger room with a double bed."),
        room("room_005", "301", "Suite", "Double", 3, RoomStatus::Available, 18000.0,
            &["WiFi", "Air Conditioning", "Private Bathroom", "Mini Fridge", "TV", "Balcony", "Kitchenette"], "Top floor suite with balcony."),
    ]
}

fn sample_announcements() -> Vec<Announcement> {
    let now = Utc::now();
    let ann = |id: &str, title: &str, content: &str, priority: Priority, age_days: i64| Announcement {
        announcement_id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        author_id: "admin".to_string(),
        priority,
        is_active: true,
        created_at: now - Duration::days(age_days),
    };
    vec![
        ann("ann_001", "Welcome to the dormitory", "Please read the house rules and reach out to staff whenever you need help.", Priority::High, 0),
        ann("ann_002", "Rent reminder", "Monthly rent is due on the 1st. Pay in the app or at the front desk.", Priority::Normal, 2),
        ann("ann_003", "Water interruption on Saturday", "Water will be off from 9 AM to 12 NN for pipe maintenance.", Priority::High, 1),
    ]
}

fn sample_faqs() -> Vec<Faq> {
    let faq = |id: &str, category: &str, order: i32, question: &str, answer: &str| Faq {
        faq_id: id.to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
        category: category.to_string(),
        order,
        is_active: true,
        created_at: Utc::now(),
    };
    vec![
        faq("faq_001", "billing", 1, "Which payment methods are accepted?", "Cash, bank transfer, GCash and Maya, at the front desk or in the app."),
        faq("faq_002", "billing", 2, "When is rent due?", "On the 1st of each month. A 5% penalty applies after the 7th."),
        faq("faq_003", "maintenance", 1, "How do I report a repair?", "Open Services, choose Maintenance Request, describe the issue and submit. Staff respond within 24 to 48 hours."),
        faq("faq_004", "rules", 1, "When are quiet hours?", "From 10:00 PM to 7:00 AM."),
        faq("faq_005", "rules", 2, "Can I have visitors?", "Between 8:00 AM and 9:00 PM after registering at the front desk. Overnight guests need approval."),
        faq("faq_006", "amenities", 1, "What comes with every room?", "WiFi, air conditioning, bed and linens, study desk and wardrobe. Laundry, kitchen and lounge are shared."),
        faq("faq_007", "general", 1, "How do I reach management?", "Use Support in the app or call the front desk."),
        faq("faq_008", "general", 2, "How do I move out?", "Give 30 days notice, book a room inspection, settle open bills and return your key."),
    ]
}

fn insert_missing<D: Document>(store: &mut Store, docs: Vec<D>) -> Result<usize> {
    let mut inserted = 0;
    for doc in docs {
        if !store.contains::<D>(doc.id()) {
            store.insert(&doc)?;
            inserted += 1;
        }
    }
    Ok(inserted)
}

/// Insert every fixture whose id is absent. Returns how many were added.
pub fn seed_all(store: &SharedStore) -> Result<usize> {
    let mut guard = store.0.lock();
    let mut inserted = insert_missing(&mut guard, sample_rooms())?;
    inserted += insert_missing(&mut guard, sample_announcements())?;
    inserted += insert_missing(&mut guard, sample_faqs())?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_is_idempotent() {
        let store = SharedStore::in_memory();
        assert_eq!(seed_all(&store).unwrap(), 16);
        assert_eq!(seed_all(&store).unwrap(), 0);
        assert_eq!(store.0.lock().count::<Room>(|r| r.status == RoomStatus::Available).unwrap(), 4);
    }

    #[test]
    fn seeding_keeps_edited_documents() {
        let store = SharedStore::in_memory();
        seed_all(&store).unwrap();
        store.0.lock().update::<Room>("room_001", |r| r.price = 9000.0).unwrap();
        seed_all(&store).unwrap();
        assert_eq!(store.0.lock().get::<Room>("room_001").unwrap().unwrap().price, 9000.0);
    }
}
