use crate::model::ApiError;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

/// Fetches rendered wiki pages through the MediaWiki parse API.
pub struct WikiClient {
    client: Client,
    parse_url: String,
}

impl WikiClient {
    pub fn new(client: Client, parse_url: impl Into<String>) -> Self {
        Self {
            client,
            parse_url: parse_url.into(),
        }
    }

    pub async fn fetch_page_html(&self) -> Result<String, ApiError> {
        info!("Fetching wiki parse API: {}", self.parse_url);
        let response = self.client.get(&self.parse_url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::InvalidResponse(format!(
                "wiki parse API returned {}",
                response.status()
            )));
        }
        let json: Value = response.json().await?;
        page_html(&json)
    }
}

/// Pulls `parse.text["*"]` out of a parse API response.
pub fn page_html(json: &Value) -> Result<String, ApiError> {
    json.pointer("/parse/text/*")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidResponse("parse API returned no HTML content".into()))
}
