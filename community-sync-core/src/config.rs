use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Policy knobs for one synchronisation run.
///
/// These were hardcoded business constants in earlier revisions; they are
/// configuration now, with the historical values as defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Minimum raw document count for a community to count as scraped.
    #[serde(default = "default_document_threshold")]
    pub document_threshold: u64,
    /// Communities created in the CMS with the premium flag off. Everything
    /// else is premium by default.
    #[serde(default = "default_premium_exclusions")]
    pub premium_exclusions: Vec<String>,
    /// Time zone used for record timestamps and the generated-at stamp.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

fn default_document_threshold() -> u64 {
    200
}

fn default_premium_exclusions() -> Vec<String> {
    vec!["cars".to_string()]
}

fn default_timezone() -> Tz {
    chrono_tz::Europe::Bratislava
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            document_threshold: default_document_threshold(),
            premium_exclusions: default_premium_exclusions(),
            timezone: default_timezone(),
        }
    }
}

impl SyncConfig {
    /// Premium flag for a community created in the publishing CMS.
    pub fn is_premium(&self, community: &str) -> bool {
        !self
            .premium_exclusions
            .iter()
            .any(|excluded| excluded == community)
    }

    pub fn trace_loaded(&self) {
        info!(
            document_threshold = self.document_threshold,
            premium_exclusions = self.premium_exclusions.len(),
            timezone = %self.timezone,
            "Loaded SyncConfig"
        );
        debug!(?self, "SyncConfig loaded (full debug)");
    }
}
