pub mod auth;
pub mod client;
pub mod delivery;
pub mod dish;
pub mod menu;
pub mod order;
