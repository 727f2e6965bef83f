//! `EntityStore` implementations.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryEntityStore;
pub use postgres::{PostgresBeerStore, PostgresCustomerStore};
