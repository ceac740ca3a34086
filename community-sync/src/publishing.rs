//! `PublishingClient` implementation over the CMS (Strapi v4) REST API.
//!
//! Name lookup uses the CMS's own case-insensitive filter
//! (`filters[name][$eqi]`), so the contract's matching rule is enforced
//! server-side. Create posts the v4 `{"data": …}` envelope; delete is keyed
//! by the numeric resource id.

use std::env;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use community_sync_core::contract::{
    NewCommunity, PublishedCommunity, PublishingClient, SourceError,
};

use crate::error::{ensure_success, ApiError, Result};
use crate::load_config::PublishingSection;

pub struct PublishingApiClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PublishingApiClient {
    pub fn new_from_env(config: &PublishingSection) -> Result<Self> {
        let token = env::var("STRAPI_API_KEY").map_err(|e| {
            tracing::error!(error = ?e, "STRAPI_API_KEY missing in environment");
            ApiError::MissingEnv("STRAPI_API_KEY")
        })?;
        tracing::info!(endpoint = %config.endpoint, "Initialized PublishingApiClient from environment");
        Ok(PublishingApiClient {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            token,
        })
    }

    async fn find_impl(&self, name: &str) -> Result<Option<PublishedCommunity>> {
        let url = format!("{}/communities", self.endpoint);
        let response = self
            .client
            .get(&url)
            .query(&[("filters[name][$eqi]", name)])
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let payload: EntryList = response.json().await?;
        Ok(payload.data.into_iter().next().map(Into::into))
    }

    async fn create_impl(&self, community: NewCommunity) -> Result<PublishedCommunity> {
        let url = format!("{}/communities", self.endpoint);
        let body = CreateEnvelope {
            data: CommunityAttributes {
                name: community.name,
                is_premium: community.is_premium,
            },
        };
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let payload: EntryEnvelope = response.json().await?;
        Ok(payload.data.into())
    }

    async fn delete_impl(&self, id: i64) -> Result<()> {
        let url = format!("{}/communities/{}", self.endpoint, id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PublishingClient for PublishingApiClient {
    async fn find_by_name(
        &self,
        name: &str,
    ) -> std::result::Result<Option<PublishedCommunity>, SourceError> {
        Ok(self.find_impl(name).await?)
    }

    async fn create(
        &self,
        community: NewCommunity,
    ) -> std::result::Result<PublishedCommunity, SourceError> {
        Ok(self.create_impl(community).await?)
    }

    async fn delete(&self, id: i64) -> std::result::Result<(), SourceError> {
        Ok(self.delete_impl(id).await?)
    }
}

#[derive(Debug, Serialize)]
struct CreateEnvelope {
    data: CommunityAttributes,
}

#[derive(Debug, Serialize, Deserialize)]
struct CommunityAttributes {
    name: String,
    #[serde(rename = "isPremium", default)]
    is_premium: bool,
}

#[derive(Debug, Deserialize)]
struct EntryList {
    #[serde(default)]
    data: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct EntryEnvelope {
    data: Entry,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: i64,
    attributes: CommunityAttributes,
}

impl From<Entry> for PublishedCommunity {
    fn from(entry: Entry) -> Self {
        PublishedCommunity {
            id: entry.id,
            name: entry.attributes.name,
            is_premium: entry.attributes.is_premium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_payload_decodes_to_the_first_entry() {
        let payload: EntryList = serde_json::from_value(json!({
            "data": [
                {"id": 12, "attributes": {"name": "cars", "isPremium": false}}
            ],
            "meta": {"pagination": {"page": 1}}
        }))
        .unwrap();

        let community: PublishedCommunity = payload.data.into_iter().next().unwrap().into();
        assert_eq!(community.id, 12);
        assert_eq!(community.name, "cars");
        assert!(!community.is_premium);
    }

    #[test]
    fn empty_filter_result_means_absent() {
        let payload: EntryList = serde_json::from_value(json!({"data": [], "meta": {}})).unwrap();
        assert!(payload.data.is_empty());
    }

    #[test]
    fn create_envelope_uses_the_cms_field_names() {
        let body = CreateEnvelope {
            data: CommunityAttributes {
                name: "books".to_string(),
                is_premium: true,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"data": {"name": "books", "isPremium": true}})
        );
    }
}
