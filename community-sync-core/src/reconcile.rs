//! Reconciliation of the publishing CMS against the finished set.
//!
//! For each community, in input order: look the name up in the CMS, then
//! create it (finished but missing), delete it (present but not finished) or
//! leave it alone. Each community is checked and mutated independently — no
//! batching — and a transport failure on one community never aborts the rest
//! of the loop; failures are logged, tallied and surfaced in the returned
//! [`ReconcilePlan`].

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::contract::{NewCommunity, PublishedCommunity, PublishingClient};

/// The action reconciliation decided for one community.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileAction {
    Create(NewCommunity),
    Delete(PublishedCommunity),
}

/// What a reconciliation run actually did.
///
/// A community appears in at most one of `created`/`deleted`; one present in
/// neither was already in the desired state (or failed, see `failures`).
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    pub created: Vec<NewCommunity>,
    pub deleted: Vec<PublishedCommunity>,
    /// Count of per-community lookup/create/delete failures that were logged
    /// and skipped.
    pub failures: u64,
}

/// Pure decision step: given what the CMS currently holds for a name and
/// whether the community is finished, decide the action (if any).
pub fn decide(
    community: &str,
    existing: Option<&PublishedCommunity>,
    is_finished: bool,
    config: &SyncConfig,
) -> Option<ReconcileAction> {
    match existing {
        None if is_finished => Some(ReconcileAction::Create(NewCommunity {
            name: community.to_string(),
            is_premium: config.is_premium(community),
        })),
        Some(entry) if !is_finished => Some(ReconcileAction::Delete(entry.clone())),
        _ => None,
    }
}

/// Check-then-act loop over all communities, in input order.
pub async fn reconcile<P>(
    client: &P,
    communities: &[String],
    finished: &HashSet<String>,
    config: &SyncConfig,
) -> ReconcilePlan
where
    P: PublishingClient,
{
    let total = communities.len();
    let mut plan = ReconcilePlan::default();

    for (index, community) in communities.iter().enumerate() {
        info!(
            progress = %format!("{}/{}", index + 1, total),
            community = %community,
            "Reconciling community"
        );

        let existing = match client.find_by_name(community).await {
            Ok(existing) => existing,
            Err(error) => {
                warn!(
                    community = %community,
                    error = %error,
                    "Publishing lookup failed, skipping community"
                );
                plan.failures += 1;
                continue;
            }
        };

        match decide(
            community,
            existing.as_ref(),
            finished.contains(community.as_str()),
            config,
        ) {
            Some(ReconcileAction::Create(new_community)) => {
                match client.create(new_community.clone()).await {
                    Ok(created) => {
                        info!(
                            community = %community,
                            id = created.id,
                            is_premium = new_community.is_premium,
                            "Created community in publishing resource"
                        );
                        plan.created.push(new_community);
                    }
                    Err(error) => {
                        warn!(
                            community = %community,
                            error = %error,
                            "Create failed, skipping community"
                        );
                        plan.failures += 1;
                    }
                }
            }
            Some(ReconcileAction::Delete(entry)) => match client.delete(entry.id).await {
                Ok(()) => {
                    info!(
                        community = %community,
                        id = entry.id,
                        "Deleted community from publishing resource"
                    );
                    plan.deleted.push(entry);
                }
                Err(error) => {
                    warn!(
                        community = %community,
                        error = %error,
                        "Delete failed, skipping community"
                    );
                    plan.failures += 1;
                }
            },
            None => {
                debug!(community = %community, "Already in desired publish state");
            }
        }
    }

    info!(
        created = plan.created.len(),
        deleted = plan.deleted.len(),
        failures = plan.failures,
        "Reconciliation finished"
    );
    plan
}
