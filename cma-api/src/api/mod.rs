//! API endpoint handlers

pub mod health;
pub mod items;

pub use health::health_routes;
pub use items::items_routes;
