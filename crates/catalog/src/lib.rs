//! Catalog resources: beers and customers.
//!
//! This crate holds the entities, their transfer representations, the
//! reconciliation rules used by PUT/PATCH, and the `ResourceService` that
//! orchestrates them against an `EntityStore`. No HTTP, no SQL.

pub mod beer;
pub mod customer;
pub mod field;
pub mod numeric;
pub mod reconcile;
pub mod service;
pub mod validation;

pub use beer::{Beer, BeerDto};
pub use customer::{Customer, CustomerDto};
pub use field::Field;
pub use numeric::{NumericText, Price};
pub use reconcile::{Operation, Resource};
pub use service::{ResourceService, ServiceError, ServiceResult};
