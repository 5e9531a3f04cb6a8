//! Progress use-case service.
//!
//! # Responsibility
//! - Reconcile a full flag submission against every catalog item.
//! - Apply bulk imports of owned item names.
//! - Build the grouped inventory view.
//!
//! # Invariants
//! - Reconciliation is full-replace: items absent from the submission end
//!   up with both flags unset.
//! - A mastered mark always produces `blueprint = true`.
//! - Markers for unknown keys are ignored; nothing is inserted.
//! - An undecodable or empty bulk import writes nothing.
//! - `apply_submission` commits all of its writes or none of them.

use crate::catalog::non_blank_lines;
use crate::db::with_immediate_transaction;
use crate::model::item::{FlagState, Item, ItemKey};
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
use crate::service::submission::{marker_key, FlagKind, FlagMarks, Submission};
use crate::view::{build_view, InventoryView};
use log::{info, warn};
use rusqlite::Connection;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

/// Planned flag write for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagUpdate {
    pub key: ItemKey,
    pub previous: FlagState,
    pub next: FlagState,
}

impl FlagUpdate {
    pub fn is_change(&self) -> bool {
        self.previous != self.next
    }
}

/// Summary of one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Items written (the whole catalog).
    pub items: usize,
    /// Items whose flags differ from before.
    pub changed: usize,
    /// Markers that name no catalog item.
    pub unknown_marks: usize,
}

/// Result of a bulk-import submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkImportOutcome {
    /// Names were applied; `rows` counts matched rows across categories.
    Applied { names: usize, rows: usize },
    /// Payload held no non-blank line.
    Empty,
    /// Payload was not valid UTF-8 and was discarded.
    Undecodable,
    /// No file was attached.
    NoFile,
}

/// Result of `apply_submission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Reconciled(ReconcileReport),
    BulkImported(BulkImportOutcome),
}

/// Computes the new flag state of every catalog item.
///
/// Pure: one update per input item, in input order, including items the
/// marks never mention.
pub fn plan_reconciliation(items: &[Item], marks: &FlagMarks) -> Vec<FlagUpdate> {
    items
        .iter()
        .map(|item| {
            let key = item.key();
            let mastered_requested = marks.is_marked(FlagKind::Mastered, &key);
            let blueprint_requested = marks.is_marked(FlagKind::Blueprint, &key);
            FlagUpdate {
                previous: item.flags(),
                next: FlagState::from_request(blueprint_requested, mastered_requested),
                key,
            }
        })
        .collect()
}

/// Decodes a bulk-import payload into a de-duplicated name set.
///
/// Returns `None` when the payload is not valid UTF-8.
pub fn parse_import_names(payload: &[u8]) -> Option<BTreeSet<String>> {
    let text = std::str::from_utf8(payload).ok()?;
    Some(non_blank_lines(text).map(str::to_string).collect())
}

/// Service facade over an item repository.
pub struct ProgressService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ProgressService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the whole catalog grouped for display.
    pub fn inventory(&self) -> RepoResult<InventoryView> {
        Ok(build_view(self.repo.get_all()?))
    }

    /// Replaces every item's flags with what `marks` requests.
    pub fn reconcile(&self, marks: &FlagMarks) -> RepoResult<ReconcileReport> {
        let items = self.repo.get_all()?;
        let plan = plan_reconciliation(&items, marks);

        let known: HashSet<String> = items
            .iter()
            .flat_map(|item| {
                let key = item.key();
                [
                    marker_key(FlagKind::Blueprint, &key),
                    marker_key(FlagKind::Mastered, &key),
                ]
            })
            .collect();
        let mut report = ReconcileReport {
            unknown_marks: marks.markers().filter(|marker| !known.contains(*marker)).count(),
            ..ReconcileReport::default()
        };

        for update in &plan {
            if self.repo.set_flags(&update.key, update.next)? {
                report.items += 1;
            }
            if update.is_change() {
                report.changed += 1;
            }
        }
        Ok(report)
    }

    /// Marks every item named in `payload` as blueprint owned and mastered.
    pub fn bulk_import(&self, payload: Option<&[u8]>) -> RepoResult<BulkImportOutcome> {
        let Some(payload) = payload else {
            return Ok(BulkImportOutcome::NoFile);
        };
        let Some(names) = parse_import_names(payload) else {
            return Ok(BulkImportOutcome::Undecodable);
        };
        if names.is_empty() {
            return Ok(BulkImportOutcome::Empty);
        }

        let rows = self.repo.bulk_set_by_name(&names)?;
        Ok(BulkImportOutcome::Applied {
            names: names.len(),
            rows,
        })
    }

    /// Names known to the store, for resolving detected names.
    pub fn known_names(&self) -> RepoResult<BTreeSet<String>> {
        self.repo.list_names()
    }
}

/// Applies one decoded submission atomically on `conn`.
pub fn apply_submission(
    conn: &mut Connection,
    submission: &Submission,
) -> RepoResult<SubmissionOutcome> {
    let started_at = Instant::now();
    let outcome = with_immediate_transaction(conn, |tx| -> Result<_, RepoError> {
        let service = ProgressService::new(SqliteItemRepository::new(tx));
        match submission {
            Submission::Reconcile(marks) => service
                .reconcile(marks)
                .map(SubmissionOutcome::Reconciled),
            Submission::BulkImport(payload) => service
                .bulk_import(payload.as_deref())
                .map(SubmissionOutcome::BulkImported),
        }
    });

    match &outcome {
        Ok(SubmissionOutcome::Reconciled(report)) => info!(
            "event=progress_reconcile module=service status=ok items={} changed={} unknown_marks={} duration_ms={}",
            report.items,
            report.changed,
            report.unknown_marks,
            started_at.elapsed().as_millis()
        ),
        Ok(SubmissionOutcome::BulkImported(BulkImportOutcome::Undecodable)) => warn!(
            "event=progress_bulk_import module=service status=discarded reason=undecodable duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Ok(SubmissionOutcome::BulkImported(result)) => info!(
            "event=progress_bulk_import module=service status=ok outcome={:?} duration_ms={}",
            result,
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=progress_submit module=service status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    outcome
}

/// Loads the grouped inventory on `conn`.
pub fn load_inventory(conn: &Connection) -> RepoResult<InventoryView> {
    ProgressService::new(SqliteItemRepository::new(conn)).inventory()
}
