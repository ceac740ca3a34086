//! High-level pipeline: read the community list, classify every community,
//! reconcile the publishing CMS, write the report back.
//!
//! # Responsibilities
//! - Per-community failure isolation in the two high-cardinality loops: a
//!   record lookup failure classifies the community as absent, a count
//!   failure counts as zero documents, and reconciliation failures are
//!   tallied inside [`reconcile`] — none of them aborts the run.
//! - Fail-fast on the sheet boundary: if the community list cannot be read
//!   or the report cannot be written, the run errors out. A silently partial
//!   report would look fresh while being stale.
//! - Structured tracing throughout, with a per-community progress field.
//!
//! Every step is idempotent (classification is pure, create/delete are each
//! safe to repeat), so re-running a failed batch is always a safe recovery.
//!
//! # Callable From
//! - The CLI crate and integration tests; collaborators are trait objects,
//!   so tests run against mocks and in-memory fakes.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::classify::{classify, CommunityStatusRow};
use crate::config::SyncConfig;
use crate::contract::{PublishingClient, RecordSource, SheetGateway};
use crate::reconcile::{reconcile, ReconcilePlan};
use crate::report::{build_report, generated_at};

/// Fatal run errors. Only the sheet boundary is fatal; everything else
/// degrades per community.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to read community list from sheet: {0}")]
    SheetRead(String),
    #[error("failed to write report to sheet: {0}")]
    SheetWrite(String),
}

/// Outcome of one full run, for operator visibility.
#[derive(Debug)]
pub struct SyncReport {
    /// All classified rows, in sheet order.
    pub rows: Vec<CommunityStatusRow>,
    /// Communities classified exactly `Finished`, in sheet order.
    pub finished: Vec<String>,
    /// Record-store lookups that failed and were classified as absent.
    pub lookup_failures: u64,
    /// What reconciliation created/deleted, plus its failure tally.
    pub plan: ReconcilePlan,
    /// The timestamp stamped next to the written report.
    pub generated_at: String,
}

/// Run the whole pipeline once.
pub async fn synchronise<R, P, S>(
    config: &SyncConfig,
    records: &R,
    publishing: &P,
    sheet: &S,
) -> Result<SyncReport, SyncError>
where
    R: RecordSource,
    P: PublishingClient,
    S: SheetGateway,
{
    info!("Starting community synchronisation run");

    let communities = sheet.read_communities().await.map_err(|error| {
        error!(error = %error, "Failed to read community list from sheet");
        SyncError::SheetRead(error.to_string())
    })?;
    info!(count = communities.len(), "Loaded community list from sheet");

    let total = communities.len();
    let mut rows: Vec<CommunityStatusRow> = Vec::with_capacity(total);
    let mut finished: HashSet<String> = HashSet::new();
    let mut lookup_failures = 0u64;

    for (index, community) in communities.iter().enumerate() {
        info!(
            progress = %format!("{}/{}", index + 1, total),
            community = %community,
            "Classifying community"
        );

        let record = match records.find(community).await {
            Ok(record) => record,
            Err(error) => {
                warn!(
                    community = %community,
                    error = %error,
                    "Record lookup failed, classifying as absent"
                );
                lookup_failures += 1;
                None
            }
        };

        let documents = if record.is_some() {
            match records.count_documents(community).await {
                Ok(count) => count,
                Err(error) => {
                    warn!(
                        community = %community,
                        error = %error,
                        "Document count unavailable, using 0"
                    );
                    0
                }
            }
        } else {
            0
        };

        let row = classify(community, record.as_ref(), documents, config);
        if row.publish {
            finished.insert(community.clone());
        }
        rows.push(row);
    }

    let plan = reconcile(publishing, &communities, &finished, config).await;

    let grid = build_report(&rows);
    let generated_at = generated_at(config.timezone);
    sheet
        .write_report(&grid, &generated_at)
        .await
        .map_err(|error| {
            error!(error = %error, "Failed to write report to sheet");
            SyncError::SheetWrite(error.to_string())
        })?;

    let finished_ordered: Vec<String> = communities
        .iter()
        .filter(|community| finished.contains(community.as_str()))
        .cloned()
        .collect();

    info!(
        communities = total,
        finished = finished_ordered.len(),
        created = plan.created.len(),
        deleted = plan.deleted.len(),
        lookup_failures,
        publishing_failures = plan.failures,
        "Synchronisation run complete"
    );

    Ok(SyncReport {
        rows,
        finished: finished_ordered,
        lookup_failures,
        plan,
        generated_at,
    })
}
