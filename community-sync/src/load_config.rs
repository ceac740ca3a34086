//! `load_config` module: loads the static YAML config into typed sections.
//!
//! This is the only place where untrusted YAML is parsed. Secrets never live
//! in the file; each client pulls its own credentials from the environment in
//! its `new_from_env` constructor. All errors here use `anyhow` so the CLI
//! surfaces context-rich diagnostics.

use std::fs;
use std::path::Path;

use anyhow::Result;
use community_sync_core::config::SyncConfig;
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub record_store: RecordStoreSection,
    pub publishing: PublishingSection,
    pub sheet: SheetSection,
    /// Policy knobs; defaults preserve the historical business constants.
    #[serde(default)]
    pub policy: SyncConfig,
}

/// Where scrape/analysis records and raw-document collections live.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordStoreSection {
    /// Atlas Data API app endpoint, e.g. `https://…/endpoint/data/v1`.
    pub endpoint: String,
    /// Atlas cluster name.
    pub data_source: String,
    #[serde(default = "default_results_database")]
    pub results_database: String,
    #[serde(default = "default_results_collection")]
    pub results_collection: String,
    #[serde(default = "default_documents_database")]
    pub documents_database: String,
    /// Per-community raw collections are `<prefix><community>`.
    #[serde(default = "default_collection_prefix")]
    pub collection_prefix: String,
    /// Records are filtered on this source tag as well as the name.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,
}

fn default_results_database() -> String {
    "campaign_data".to_string()
}

fn default_results_collection() -> String {
    "campaign_results".to_string()
}

fn default_documents_database() -> String {
    "culturepulse_social_media".to_string()
}

fn default_collection_prefix() -> String {
    "reddit_data_".to_string()
}

fn default_source_tag() -> String {
    "reddit".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingSection {
    /// CMS API base, e.g. `https://…/api`.
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetSection {
    pub spreadsheet_id: String,
    /// Tab holding the source-of-truth community column.
    pub communities_tab: String,
    /// Tab the rendered report is written to.
    pub report_tab: String,
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(config) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            config
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    Ok(config)
}
