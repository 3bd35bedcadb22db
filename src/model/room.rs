use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Document;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub room_number: String,
    pub room_type: String,
    pub bed_type: String,
    pub capacity: u32,
    pub floor: i32,
    pub status: RoomStatus,
    pub price: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// base64-encoded pictures
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document for Room {
    const COLLECTION: &'static str = "rooms";
    fn id(&self) -> &str { &self.room_id }
}

fn default_capacity() -> u32 { 1 }
fn default_floor() -> i32 { 1 }
fn default_price() -> f64 { 8000.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct RoomCreate {
    pub room_number: String,
    pub room_type: String,
    pub bed_type: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default = "default_floor")]
    pub floor: i32,
    #[serde(default = "default_price")]
    pub price: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RoomCreate {
    pub fn into_room(self) -> Room {
        Room {
            room_id: super::new_id("room"),
            room_number: self.room_number,
            room_type: self.room_type,
            bed_type: self.bed_type,
            capacity: self.capacity,
            floor: self.floor,
            status: RoomStatus::Available,
            price: self.price,
            amenities: self.amenities,
            images: self.images,
            description: self.description,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomUpdate {
    pub room_number: Option<String>,
    pub room_type: Option<String>,
    pub bed_type: Option<String>,
    pub capacity: Option<u32>,
    pub floor: Option<i32>,
    pub status: Option<RoomStatus>,
    pub price: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
}

impl RoomUpdate {
    pub fn apply(self, room: &mut Room) {
        if let Some(v) = self.room_number { room.room_number = v; }
        if let Some(v) = self.room_type { room.room_type = v; }
        if let Some(v) = self.bed_type { room.bed_type = v; }
        if let Some(v) = self.capacity { room.capacity = v; }
        if let Some(v) = self.floor { room.floor = v; }
        if let Some(v) = self.status { room.status = v; }
        if let Some(v) = self.price { room.price = v; }
        if let Some(v) = self.amenities { room.amenities = v; }
        if let Some(v) = self.images { room.images = v; }
        if let Some(v) = self.description { room.description = Some(v); }
    }
}
