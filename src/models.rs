pub mod admin;
pub mod auth;
pub mod chat;
pub mod cooperative;
pub mod delivery;
pub mod order;
pub mod pest;
pub mod product;
pub mod supplier;
pub mod weather;
