pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod booking_repo;
pub mod seed;

pub use app_config::Config;
pub use booking_repo::PgBookingRepository;
pub use catalog_repo::PgCatalogRepository;
pub use database::DbClient;
