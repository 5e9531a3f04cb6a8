//! Scoped write transactions.
//!
//! # Invariants
//! - The transaction is started with `BEGIN IMMEDIATE`, so the write lock is
//!   taken up front and concurrent writers serialize (last write wins).
//! - `Ok` commits; `Err` (or unwinding) drops the transaction, which rolls
//!   it back.

use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Runs `f` inside one immediate transaction on `conn`.
///
/// The closure receives the open transaction; it dereferences to
/// `Connection`, so repositories can be constructed on top of it.
pub fn with_immediate_transaction<T, E, F>(conn: &mut Connection, f: F) -> Result<T, E>
where
    E: From<rusqlite::Error>,
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
