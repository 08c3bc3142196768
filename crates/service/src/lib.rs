//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Ships a SeaORM and an in-memory repository implementation.

pub mod errors;
pub mod catalog;
pub mod subscription;
pub mod repo;
#[cfg(test)]
pub mod test_support;
