use crate::model::ApiError;
use serde_json::Value;

/// Upstream game API, returning its JSON documents untouched.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    async fn fetch_profiles(&self, uuid: &str, api_key: &str) -> Result<Value, ApiError>;
    async fn fetch_museum(&self, profile_id: &str, api_key: &str) -> Result<Value, ApiError>;
}
