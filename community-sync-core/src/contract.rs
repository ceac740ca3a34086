//! # contract: interfaces to the three external collaborators
//!
//! This module defines the traits the synchronisation pipeline consumes — the
//! record store holding scrape/analysis results, the publishing CMS exposing
//! which communities are publicly listed, and the spreadsheet carrying the
//! source-of-truth community list — together with the plain data types they
//! exchange.
//!
//! ## Interface & Extensibility
//! - Implement [`RecordSource`] over any document or relational store that can
//!   look up one community's latest record and count its raw documents.
//! - Implement [`PublishingClient`] over any CRUD API with case-insensitive
//!   name lookup.
//! - Implement [`SheetGateway`] over whatever holds the community list and
//!   receives the rendered report.
//! - All methods are async, returning boxed error trait objects so transport
//!   errors of any shape flow through uniformly.
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall`, so consumers get deterministic
//!   mocks for unit and integration tests (exported behind the
//!   `test-export-mocks` feature).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use mockall::automock;

/// Uniform boxed error type for all collaborator calls.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// An interest-group label as the record store actually stores it.
///
/// The store sometimes represents a missing label as a numeric null (a float
/// NaN); keeping the numeric variant distinct lets the classifier normalize
/// that sentinel instead of trusting the wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum InterestGroup {
    Text(String),
    Number(f64),
}

/// A record's last-updated timestamp.
///
/// Only the structured variant is rendered with time-zone conversion; a raw
/// scalar passes through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordTimestamp {
    DateTime(DateTime<Utc>),
    Raw(String),
}

/// Per-stage analysis completion flags for one community.
///
/// Absence of the whole struct (no analysis ran at all) is modeled as
/// `Option<AnalysisResult>` on [`CommunityRecord`] and is distinct from a
/// present struct with all three flags false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub topic_model: bool,
    pub market_profile: bool,
    pub psych_data: bool,
}

/// The latest scrape/analysis record for one community, as returned by the
/// record store. Absence of a record is a valid state, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityRecord {
    pub community: String,
    pub interest_group: Option<InterestGroup>,
    pub timestamp: Option<RecordTimestamp>,
    pub analysis: Option<AnalysisResult>,
}

/// A community entry as it exists in the publishing CMS.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedCommunity {
    pub id: i64,
    pub name: String,
    pub is_premium: bool,
}

/// The minimum data needed to create a community in the publishing CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunity {
    pub name: String,
    pub is_premium: bool,
}

/// Lookup/count access to the store of scrape and analysis results.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the latest record for a community, or `None` when the store has
    /// never seen it.
    async fn find(&self, community: &str) -> Result<Option<CommunityRecord>, SourceError>;

    /// Approximate count of raw documents collected for a community.
    async fn count_documents(&self, community: &str) -> Result<u64, SourceError>;
}

/// CRUD access to the publishing CMS's community resource.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PublishingClient: Send + Sync {
    /// Look up a community by name. Name matching is case-insensitive
    /// equality; at most one entry is expected per name.
    async fn find_by_name(&self, name: &str) -> Result<Option<PublishedCommunity>, SourceError>;

    /// Create a community entry.
    async fn create(&self, community: NewCommunity) -> Result<PublishedCommunity, SourceError>;

    /// Delete a community entry by its resource id.
    async fn delete(&self, id: i64) -> Result<(), SourceError>;
}

/// Access to the spreadsheet: the community list in, the rendered report out.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SheetGateway: Send + Sync {
    /// Read the community identifier column, skipping its header row and
    /// deduplicating while preserving first-seen order.
    async fn read_communities(&self) -> Result<Vec<String>, SourceError>;

    /// Clear the report tab, write the full grid (header + data rows) and
    /// stamp the generated-at marker beside it.
    async fn write_report(
        &self,
        grid: &[Vec<String>],
        generated_at: &str,
    ) -> Result<(), SourceError>;
}
