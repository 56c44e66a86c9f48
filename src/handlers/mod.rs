pub mod assigned_items;
pub mod boats;
pub mod inventory;
pub mod products;
pub mod token;
pub mod user;
