//! Repository implementations: SeaORM for production, in-memory for tests
//! and for running the HTTP layer without a database.

pub mod memory;
pub mod seaorm;
