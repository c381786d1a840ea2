pub mod auth;
pub mod backend;
pub mod clients;
pub mod delivery;
pub mod dishes;
pub mod drafts;
pub mod menu;
pub mod menu_editor;
pub mod metrics;
pub mod order_store;
pub mod orders;
pub mod week;
