pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod delivery_repo;
pub use delivery_repo::DeliveryRepository;
pub mod chat_repo;
pub use chat_repo::ChatRepository;
pub mod pest_repo;
pub use pest_repo::PestRepository;
pub mod supplier_repo;
pub use supplier_repo::SupplierRepository;
pub mod cooperative_repo;
pub use cooperative_repo::CooperativeRepository;
pub mod weather_repo;
pub use weather_repo::WeatherRepository;
pub mod admin_repo;

pub use admin_repo::AdminRepository;
