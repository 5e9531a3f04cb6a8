//! Domain model for collection progress.
//!
//! # Responsibility
//! - Define the canonical item record and its identity.
//! - Own the flag invariant shared by every write path.
//!
//! # Invariants
//! - Every item is identified by its `(category, name)` pair.
//! - `mastered == true` implies `blueprint == true`.

pub mod item;
