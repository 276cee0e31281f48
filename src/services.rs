pub mod auth;
pub mod product_service;
pub mod order_service;
pub mod transport_service;
pub mod chat_service;
pub mod chatbot;
pub mod pest_matcher;
pub mod pest_service;
pub mod supplier_service;
pub mod cooperative_service;
pub mod weather_service;
pub mod admin_service;
