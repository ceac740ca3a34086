//! CLI glue for community-sync: command parsing, client construction and the
//! async entrypoint. All decision logic lives in `community-sync-core`.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use community_sync_core::synchronise::synchronise;

use crate::load_config::load_config;
use crate::publishing::PublishingApiClient;
use crate::record_store::RecordStoreClient;
use crate::sheets::SheetClient;

/// CLI for community-sync: reconcile community scrape status across the
/// record store, the publishing CMS and the status spreadsheet.
#[derive(Parser)]
#[clap(
    name = "community-sync",
    version,
    about = "Classify community scrape status, sync the publishing CMS and rewrite the status report"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one full classification + reconciliation + report pass
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;
            config.policy.trace_loaded();
            tracing::info!(command = "sync", "Starting synchronisation run");

            let records = RecordStoreClient::new_from_env(&config.record_store)?;
            let publishing = PublishingApiClient::new_from_env(&config.publishing)?;
            let sheet = SheetClient::new_from_env(&config.sheet)?;

            match synchronise(&config.policy, &records, &publishing, &sheet).await {
                Ok(report) => {
                    tracing::info!(
                        command = "sync",
                        communities = report.rows.len(),
                        finished = report.finished.len(),
                        created = report.plan.created.len(),
                        deleted = report.plan.deleted.len(),
                        lookup_failures = report.lookup_failures,
                        publishing_failures = report.plan.failures,
                        generated_at = %report.generated_at,
                        "Synchronisation complete"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(e.into())
                }
            }
        }
    }
}
