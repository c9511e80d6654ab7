use crate::utils::sanitize_file_component;
use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};

/// Best-effort dump of raw museum payloads, one file per fetch.
#[derive(Debug, Clone)]
pub struct PayloadLog {
    dir: PathBuf,
}

impl PayloadLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_name(uuid: &str, profile_id: &str, millis: i64) -> String {
        let profile = match sanitize_file_component(profile_id) {
            p if p.is_empty() => "unknown".to_string(),
            p => p,
        };
        format!(
            "museum_{}_{}_{}.json",
            sanitize_file_component(uuid),
            profile,
            millis
        )
    }

    /// Writes the payload; failures are logged and swallowed.
    pub async fn record(&self, uuid: &str, profile_id: &str, payload: &Value) -> Option<PathBuf> {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!("Failed to create payload log folder: {}", e);
            return None;
        }
        let path = self
            .dir
            .join(Self::file_name(uuid, profile_id, Utc::now().timestamp_millis()));
        let body = match serde_json::to_string_pretty(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize museum payload: {}", e);
                return None;
            }
        };
        if let Err(e) = tokio::fs::write(&path, body).await {
            warn!("Failed to write museum log: {}", e);
            return None;
        }
        info!("Saved museum payload: {}", path.display());
        Some(path)
    }
}
