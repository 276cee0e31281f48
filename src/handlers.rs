pub mod admin;
pub mod auth;
pub mod chat;
pub mod cooperative;
pub mod orders;
pub mod pest;
pub mod products;
pub mod supplier;
pub mod transport;
pub mod weather;
