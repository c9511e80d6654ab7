use crate::api::GameApi;
use crate::model::ApiError;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

pub struct HypixelClient {
    pub client: Client,
    base_url: String,
    items_url: String,
}

impl HypixelClient {
    pub fn new(
        user_agent: &str,
        base_url: impl Into<String>,
        items_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(client, base_url, items_url))
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        items_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            items_url: items_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// The body is decoded whatever the status, so `success: false` payloads
    /// reach the caller.
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("GET {} -> {}", url, status);
        Ok(serde_json::from_str(&body)?)
    }

    /// Item registry used to build the API-derived catalog.
    pub async fn fetch_items_resource(&self) -> Result<Value, ApiError> {
        info!("Fetching item registry: {}", self.items_url);
        let response = self.client.get(&self.items_url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::InvalidResponse(format!(
                "item registry returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl GameApi for HypixelClient {
    async fn fetch_profiles(&self, uuid: &str, api_key: &str) -> Result<Value, ApiError> {
        let url = self.endpoint("profiles");
        self.get_json(&url, &[("key", api_key), ("uuid", uuid)]).await
    }

    async fn fetch_museum(&self, profile_id: &str, api_key: &str) -> Result<Value, ApiError> {
        let url = self.endpoint("museum");
        self.get_json(&url, &[("key", api_key), ("profile", profile_id)]).await
    }
}
