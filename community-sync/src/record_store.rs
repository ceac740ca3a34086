//! `RecordSource` implementation over the MongoDB Atlas Data API.
//!
//! Two calls per community: `findOne` against the results collection for the
//! scrape/analysis record, and an `aggregate` `$count` against the
//! per-community raw collection. EJSON quirks of the wire format — `$date`
//! envelopes and `$numberDouble: "NaN"` interest groups — are normalized here
//! so the core only ever sees typed values.

use std::env;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use community_sync_core::contract::{
    AnalysisResult, CommunityRecord, InterestGroup, RecordSource, RecordTimestamp, SourceError,
};

use crate::error::{ensure_success, ApiError, Result};
use crate::load_config::RecordStoreSection;

pub struct RecordStoreClient {
    client: reqwest::Client,
    config: RecordStoreSection,
    api_key: String,
}

impl RecordStoreClient {
    pub fn new_from_env(config: &RecordStoreSection) -> Result<Self> {
        let api_key = env::var("MONGODB_DATA_API_KEY").map_err(|e| {
            tracing::error!(error = ?e, "MONGODB_DATA_API_KEY missing in environment");
            ApiError::MissingEnv("MONGODB_DATA_API_KEY")
        })?;
        tracing::info!(
            endpoint = %config.endpoint,
            data_source = %config.data_source,
            "Initialized RecordStoreClient from environment"
        );
        Ok(RecordStoreClient {
            client: reqwest::Client::new(),
            config: config.clone(),
            api_key,
        })
    }

    async fn action(&self, action: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        let url = format!("{}/action/{}", self.config.endpoint, action);
        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        ensure_success(response).await
    }

    async fn find_record(&self, community: &str) -> Result<Option<CommunityRecord>> {
        let body = json!({
            "dataSource": self.config.data_source,
            "database": self.config.results_database,
            "collection": self.config.results_collection,
            "filter": {
                "community": community,
                "source": self.config.source_tag,
            },
        });

        let response = self.action("findOne", &body).await?;
        let payload: FindOneResponse = response.json().await?;
        Ok(payload.document.map(|wire| wire.into_record(community)))
    }

    async fn count(&self, community: &str) -> Result<u64> {
        let collection = format!("{}{}", self.config.collection_prefix, community);
        let body = json!({
            "dataSource": self.config.data_source,
            "database": self.config.documents_database,
            "collection": collection,
            "pipeline": [{"$count": "count"}],
        });

        let response = self.action("aggregate", &body).await?;
        let payload: AggregateResponse = response.json().await?;
        // An empty pipeline result means the collection has no documents.
        Ok(payload
            .documents
            .into_iter()
            .next()
            .map(|doc| doc.count)
            .unwrap_or(0))
    }
}

#[async_trait]
impl RecordSource for RecordStoreClient {
    async fn find(&self, community: &str) -> std::result::Result<Option<CommunityRecord>, SourceError> {
        Ok(self.find_record(community).await?)
    }

    async fn count_documents(&self, community: &str) -> std::result::Result<u64, SourceError> {
        Ok(self.count(community).await?)
    }
}

#[derive(Debug, Deserialize)]
struct FindOneResponse {
    document: Option<WireRecord>,
}

#[derive(Debug, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    documents: Vec<CountDocument>,
}

#[derive(Debug, Deserialize)]
struct CountDocument {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(default)]
    community: Option<String>,
    #[serde(default)]
    interest_group: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    reddit: Option<WireAnalysis>,
}

/// Stage fields hold full analysis payloads; only their presence matters
/// here, with the same truthiness the results pipeline applies when writing.
#[derive(Debug, Deserialize)]
struct WireAnalysis {
    #[serde(rename = "topicModelAnalysis", default)]
    topic_model: Option<Value>,
    #[serde(rename = "marketprofile", default)]
    market_profile: Option<Value>,
    #[serde(rename = "psychData", default)]
    psych_data: Option<Value>,
}

impl WireRecord {
    fn into_record(self, community: &str) -> CommunityRecord {
        CommunityRecord {
            community: self.community.unwrap_or_else(|| community.to_string()),
            interest_group: self.interest_group.and_then(interest_group_from_wire),
            timestamp: self.timestamp.and_then(timestamp_from_wire),
            analysis: self.reddit.map(|wire| AnalysisResult {
                topic_model: truthy(wire.topic_model.as_ref()),
                market_profile: truthy(wire.market_profile.as_ref()),
                psych_data: truthy(wire.psych_data.as_ref()),
            }),
        }
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

fn interest_group_from_wire(value: Value) -> Option<InterestGroup> {
    match value {
        Value::String(label) => Some(InterestGroup::Text(label)),
        Value::Number(number) => number.as_f64().map(InterestGroup::Number),
        // EJSON numeric envelope; "NaN" parses to f64::NAN here.
        Value::Object(fields) => fields
            .get("$numberDouble")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<f64>().ok())
            .map(InterestGroup::Number),
        _ => None,
    }
}

fn timestamp_from_wire(value: Value) -> Option<RecordTimestamp> {
    match value {
        Value::String(raw) => Some(RecordTimestamp::Raw(raw)),
        Value::Object(fields) => match fields.get("$date") {
            // Relaxed EJSON: {"$date": "2023-06-15T10:00:00Z"}
            Some(Value::String(iso)) => DateTime::parse_from_rfc3339(iso)
                .ok()
                .map(|at| RecordTimestamp::DateTime(at.with_timezone(&Utc))),
            // Canonical EJSON: {"$date": {"$numberLong": "1686823200000"}}
            Some(Value::Object(inner)) => inner
                .get("$numberLong")
                .and_then(Value::as_str)
                .and_then(|raw| raw.parse::<i64>().ok())
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .map(RecordTimestamp::DateTime),
            _ => None,
        },
        Value::Null => None,
        other => Some(RecordTimestamp::Raw(other.to_string())),
    }
}
