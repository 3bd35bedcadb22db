pub mod error;
pub mod config;
pub mod storage;
pub mod model;
pub mod identity;
pub mod seed;
pub mod server;
pub mod chat;
