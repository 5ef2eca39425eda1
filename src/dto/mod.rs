pub mod auth;
pub mod catalog;
pub mod forms;
pub mod products;
pub mod sizes;
pub mod stock;
pub mod users;
pub mod warehouse;
