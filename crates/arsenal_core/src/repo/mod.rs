//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the progress-store access contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce item validation before persistence.
//! - Writes against unknown keys affect nothing and are not errors.

pub mod item_repo;
