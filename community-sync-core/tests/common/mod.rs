//! Shared test support: record fixtures and an in-memory publishing fake.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use community_sync_core::contract::{
    AnalysisResult, CommunityRecord, NewCommunity, PublishedCommunity, PublishingClient,
    SourceError,
};

/// Stateful in-memory `PublishingClient`, honouring the contract's
/// case-insensitive name matching. Backs the idempotence and end-to-end
/// scenarios, where mock expectations would have to mirror state anyway.
pub struct InMemoryPublishing {
    entries: Mutex<Vec<PublishedCommunity>>,
    next_id: AtomicI64,
}

impl InMemoryPublishing {
    pub fn new(seed: Vec<PublishedCommunity>) -> Self {
        let next_id = seed.iter().map(|entry| entry.id).max().unwrap_or(0) + 1;
        InMemoryPublishing {
            entries: Mutex::new(seed),
            next_id: AtomicI64::new(next_id),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }
}

#[async_trait]
impl PublishingClient for InMemoryPublishing {
    async fn find_by_name(&self, name: &str) -> Result<Option<PublishedCommunity>, SourceError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn create(&self, community: NewCommunity) -> Result<PublishedCommunity, SourceError> {
        let entry = PublishedCommunity {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: community.name,
            is_premium: community.is_premium,
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn delete(&self, id: i64) -> Result<(), SourceError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(format!("no community with id {id}").into());
        }
        Ok(())
    }
}

pub fn full_analysis() -> AnalysisResult {
    AnalysisResult {
        topic_model: true,
        market_profile: true,
        psych_data: true,
    }
}

pub fn record(community: &str, analysis: Option<AnalysisResult>) -> CommunityRecord {
    CommunityRecord {
        community: community.to_string(),
        interest_group: None,
        timestamp: None,
        analysis,
    }
}
