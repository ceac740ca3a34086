//! Pipeline-progress classification for a single community.
//!
//! [`classify`] is a pure function: one community's record (or its absence)
//! plus its raw document count go in, one [`CommunityStatusRow`] comes out.
//! The decision sequence is ordered and first-match-wins:
//!
//! 1. no record at all → `Not scraped`
//! 2. record, but fewer documents than the threshold → `Not scraped`
//!    (document volume gates everything downstream, analysis included)
//! 3. record, enough documents, no analysis sub-record → `Not analysed`
//! 4. analysis present but at least one stage flag down → composite
//!    `Not analysed` / `Not profiled` status with a composite reason
//! 5. all three stage flags up → `Finished`
//!
//! The decision itself is modeled as the [`Outcome`] enum; the display
//! status/reason strings are derived from it in one place so the composite
//! joining rules are never duplicated.

use chrono_tz::Tz;

use crate::config::SyncConfig;
use crate::contract::{CommunityRecord, InterestGroup, RecordTimestamp};

/// Rendering format for record timestamps and the generated-at stamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const REASON_RECORD_MISSING: &str = "Not found in \"campaign_results\"";
const REASON_ANALYSIS_MISSING: &str = "Not found \"reddit object\"";

/// The status taxonomy rendered into the report's Status column.
///
/// `InProgress` has no producing rule in the current decision sequence; it is
/// a label earlier report revisions emitted and sheet-side filters still
/// reference, so its rendering is kept stable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Finished,
    NotScraped,
    NotAnalysed,
    NotProfiled,
    InProgress,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Finished => "Finished",
            StatusKind::NotScraped => "Not scraped",
            StatusKind::NotAnalysed => "Not analysed",
            StatusKind::NotProfiled => "Not profiled",
            StatusKind::InProgress => "In progress",
        }
    }
}

/// The classifier's decision, before any display-string rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record store has never seen this community.
    RecordMissing,
    /// A record exists but too few raw documents were collected.
    BelowThreshold { threshold: u64 },
    /// Enough documents, but no analysis sub-record at all.
    AnalysisMissing,
    /// Analysis ran but at least one stage flag is down.
    AnalysisIncomplete {
        topic_model: bool,
        market_profile: bool,
        psych_data: bool,
    },
    /// All three stage flags are up.
    Finished,
}

impl Outcome {
    /// Display status, composite statuses comma-joined without spaces in
    /// topic-check-then-profile-check order.
    pub fn status(&self) -> String {
        match self {
            Outcome::RecordMissing | Outcome::BelowThreshold { .. } => {
                StatusKind::NotScraped.as_str().to_string()
            }
            Outcome::AnalysisMissing => StatusKind::NotAnalysed.as_str().to_string(),
            Outcome::AnalysisIncomplete {
                topic_model,
                market_profile,
                psych_data,
            } => {
                let mut statuses = Vec::new();
                if !topic_model {
                    statuses.push(StatusKind::NotAnalysed.as_str());
                }
                if !psych_data || !market_profile {
                    statuses.push(StatusKind::NotProfiled.as_str());
                }
                statuses.join(",")
            }
            Outcome::Finished => StatusKind::Finished.as_str().to_string(),
        }
    }

    /// Display reason; empty for `Finished`.
    pub fn reason(&self) -> String {
        match self {
            Outcome::RecordMissing => REASON_RECORD_MISSING.to_string(),
            Outcome::BelowThreshold { threshold } => format!("Documents < {threshold}"),
            Outcome::AnalysisMissing => REASON_ANALYSIS_MISSING.to_string(),
            Outcome::AnalysisIncomplete {
                topic_model,
                market_profile,
                psych_data,
            } => {
                let mut reasons = Vec::new();
                if !topic_model {
                    reasons.push("topicModelAnalysis");
                }
                if !psych_data {
                    reasons.push("psychData");
                }
                if !market_profile {
                    reasons.push("marketprofile");
                }
                format!("Not found: {}", reasons.join(","))
            }
            Outcome::Finished => String::new(),
        }
    }

    /// Per-stage booleans: `true` only when the stage's data is confirmed
    /// present, `false` when the owning stage was never reached.
    pub fn stage_flags(&self) -> (bool, bool, bool) {
        match self {
            Outcome::RecordMissing
            | Outcome::BelowThreshold { .. }
            | Outcome::AnalysisMissing => (false, false, false),
            Outcome::AnalysisIncomplete {
                topic_model,
                market_profile,
                psych_data,
            } => (*topic_model, *market_profile, *psych_data),
            Outcome::Finished => (true, true, true),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished)
    }
}

/// One report row for one community. Recomputed from scratch every run.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityStatusRow {
    pub interest_group: String,
    pub community: String,
    pub documents: u64,
    pub date: String,
    pub reason: String,
    pub status: String,
    /// `true` iff status is exactly `Finished`; gates CMS publication.
    pub publish: bool,
    pub topic_model_analysis: bool,
    pub market_profile: bool,
    pub psych_data: bool,
}

/// Classify one community's pipeline progress.
///
/// `documents` is ignored (forced to 0) when `record` is absent: a community
/// the store has never seen has no raw collection to count.
pub fn classify(
    community: &str,
    record: Option<&CommunityRecord>,
    documents: u64,
    config: &SyncConfig,
) -> CommunityStatusRow {
    let Some(record) = record else {
        return render_row(community, String::new(), 0, String::new(), Outcome::RecordMissing);
    };

    let interest_group = render_interest_group(record.interest_group.as_ref());
    let date = render_timestamp(record.timestamp.as_ref(), config.timezone);

    let outcome = if documents < config.document_threshold {
        Outcome::BelowThreshold {
            threshold: config.document_threshold,
        }
    } else {
        match record.analysis {
            None => Outcome::AnalysisMissing,
            Some(analysis)
                if !(analysis.topic_model && analysis.market_profile && analysis.psych_data) =>
            {
                Outcome::AnalysisIncomplete {
                    topic_model: analysis.topic_model,
                    market_profile: analysis.market_profile,
                    psych_data: analysis.psych_data,
                }
            }
            Some(_) => Outcome::Finished,
        }
    };

    render_row(community, interest_group, documents, date, outcome)
}

fn render_row(
    community: &str,
    interest_group: String,
    documents: u64,
    date: String,
    outcome: Outcome,
) -> CommunityStatusRow {
    let (topic_model_analysis, market_profile, psych_data) = outcome.stage_flags();
    CommunityStatusRow {
        interest_group,
        community: community.to_string(),
        documents,
        date,
        reason: outcome.reason(),
        status: outcome.status(),
        publish: outcome.is_finished(),
        topic_model_analysis,
        market_profile,
        psych_data,
    }
}

/// The record store represents some missing labels as a numeric NaN; that
/// sentinel renders as an empty string, any other number via plain display.
fn render_interest_group(interest_group: Option<&InterestGroup>) -> String {
    match interest_group {
        None => String::new(),
        Some(InterestGroup::Text(label)) => label.clone(),
        Some(InterestGroup::Number(value)) if value.is_nan() => String::new(),
        Some(InterestGroup::Number(value)) => value.to_string(),
    }
}

/// Structured timestamps are converted to the configured zone; raw scalars
/// pass through unchanged. The asymmetry is intentional.
fn render_timestamp(timestamp: Option<&RecordTimestamp>, timezone: Tz) -> String {
    match timestamp {
        None => String::new(),
        Some(RecordTimestamp::DateTime(at)) => at
            .with_timezone(&timezone)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
        Some(RecordTimestamp::Raw(raw)) => raw.clone(),
    }
}
