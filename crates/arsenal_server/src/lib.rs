//! HTTP surface and command-line entry points for arsenal.
//!
//! # Responsibility
//! - Serve the inventory page and accept flag submissions over HTTP.
//! - Run one-shot maintenance commands (catalog seed, bulk import).
//!
//! # Invariants
//! - Every request opens its own store connection and drops it on return.
//! - The catalog seed runs once per process, before the listener binds.

pub mod commands;
pub mod config;
pub mod web;
