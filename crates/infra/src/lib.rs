//! Infrastructure layer: entity stores, database bootstrap, sample data.

pub mod db;
pub mod seed;
pub mod store;

pub use seed::{SeedReport, seed_sample_data};
pub use store::{InMemoryEntityStore, PostgresBeerStore, PostgresCustomerStore};
