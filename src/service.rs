// Request boundary: one full fetch-and-reconcile cycle per request.
use crate::analyzer::{extract_donations, reconcile, select_profile};
use crate::api::GameApi;
use crate::model::{MuseumDataset, MuseumReport, MuseumRequest, MuseumResponse, ServiceError};
use crate::storage::PayloadLog;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct MuseumService {
    api: Arc<dyn GameApi>,
    dataset: Arc<MuseumDataset>,
    payload_log: Option<PayloadLog>,
}

impl MuseumService {
    pub fn new(api: Arc<dyn GameApi>, dataset: Arc<MuseumDataset>, payload_log: Option<PayloadLog>) -> Self {
        Self {
            api,
            dataset,
            payload_log,
        }
    }

    /// Handles one request and maps every failure onto a response shape.
    pub async fn handle(&self, request: &MuseumRequest) -> MuseumResponse {
        match self.run(request).await {
            Ok(report) => match serde_json::to_value(&report) {
                Ok(body) => MuseumResponse { status: 200, body },
                Err(e) => {
                    error!("Failed to serialize report: {}", e);
                    server_error(&e.to_string())
                }
            },
            Err(e) => error_response(e),
        }
    }

    async fn run(&self, request: &MuseumRequest) -> Result<MuseumReport, ServiceError> {
        let (uuid, api_key) = match (non_empty(&request.uuid), non_empty(&request.api_key)) {
            (Some(uuid), Some(key)) => (uuid, key),
            _ => return Err(ServiceError::MissingInput),
        };

        info!("Fetching profiles for {}", uuid);
        let profiles = self.api.fetch_profiles(uuid, api_key).await?;
        if !is_success(&profiles) {
            return Err(ServiceError::Upstream {
                context: "Failed to fetch profiles",
                details: profiles,
            });
        }

        let profile = profiles
            .get("profiles")
            .and_then(|list| select_profile(list, uuid))
            .ok_or(ServiceError::NoProfile)?;
        let profile_id = profile
            .get("profile_id")
            .and_then(Value::as_str)
            .ok_or(ServiceError::NoProfile)?
            .to_string();

        info!("Fetching museum for profile {}", profile_id);
        let museum = self.api.fetch_museum(&profile_id, api_key).await?;
        if !is_success(&museum) {
            return Err(ServiceError::Upstream {
                context: "Failed to fetch museum",
                details: museum,
            });
        }

        if let Some(log) = &self.payload_log {
            log.record(uuid, &profile_id, &museum).await;
        }

        let donations = extract_donations(&museum, uuid, &self.dataset.aliases);
        let result = reconcile(&self.dataset, &donations);
        info!(
            "Museum for {}: {} donated, {} missing",
            uuid,
            result.counts.donated,
            result.missing.len()
        );

        Ok(MuseumReport {
            success: true,
            profile_id,
            categories: result.categories,
            counts: result.counts,
            missing: result.missing,
            hints: result.hints,
            raw: museum,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn is_success(document: &Value) -> bool {
    document.get("success").is_some_and(crate::utils::is_truthy)
}

fn error_response(e: ServiceError) -> MuseumResponse {
    let message = e.to_string();
    match e {
        ServiceError::MissingInput => MuseumResponse {
            status: 400,
            body: json!({ "error": message }),
        },
        ServiceError::Upstream { context, details } => {
            warn!("{}", context);
            MuseumResponse {
                status: 502,
                body: json!({ "error": context, "details": details }),
            }
        }
        ServiceError::NoProfile => MuseumResponse {
            status: 404,
            body: json!({ "error": message }),
        },
        ServiceError::Api(e) => {
            error!("Unexpected error: {}", e);
            server_error(&message)
        }
    }
}

fn server_error(details: &str) -> MuseumResponse {
    MuseumResponse {
        status: 500,
        body: json!({ "error": "Unexpected server error", "details": details }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AliasTable, ApiError, Catalog, CatalogKind};
    use std::sync::Mutex;

    const UUID: &str = "069a79f4-44e9-4726-a5be-fca90e38aaf5";
    const KEY: &str = "069a79f444e94726a5befca90e38aaf5";

    #[derive(Default)]
    struct StubApi {
        profiles: Option<Value>,
        museum: Option<Value>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl GameApi for StubApi {
        async fn fetch_profiles(&self, uuid: &str, _api_key: &str) -> Result<Value, ApiError> {
            self.calls.lock().unwrap().push(format!("profiles:{uuid}"));
            self.profiles
                .clone()
                .ok_or_else(|| ApiError::InvalidResponse("connection reset".into()))
        }

        async fn fetch_museum(&self, profile_id: &str, _api_key: &str) -> Result<Value, ApiError> {
            self.calls.lock().unwrap().push(format!("museum:{profile_id}"));
            self.museum
                .clone()
                .ok_or_else(|| ApiError::InvalidResponse("connection reset".into()))
        }
    }

    fn weapons_dataset() -> Arc<MuseumDataset> {
        let mut catalog = Catalog::new();
        catalog.push_category("Weapons", vec!["Sword A".into(), "Sword B".into()]);
        Arc::new(MuseumDataset {
            catalog,
            aliases: AliasTable::new(),
            kind: CatalogKind::Wiki,
        })
    }

    fn request(uuid: &str, key: &str) -> MuseumRequest {
        MuseumRequest {
            uuid: Some(uuid.to_string()),
            api_key: Some(key.to_string()),
        }
    }

    fn profiles_ok() -> Value {
        json!({
            "success": true,
            "profiles": [
                { "profile_id": "old", "members": { KEY: { "last_save": 10 } } },
                { "profile_id": "new", "members": { KEY: { "last_save": 20 } } }
            ]
        })
    }

    #[tokio::test]
    async fn full_cycle_reports_missing_items() {
        let museum = json!({ "success": true, "members": { KEY: { "Weapons": [{ "name": "Sword A" }] } } });
        let api = Arc::new(StubApi {
            profiles: Some(profiles_ok()),
            museum: Some(museum.clone()),
            ..Default::default()
        });
        let service = MuseumService::new(api.clone(), weapons_dataset(), None);

        let response = service.handle(&request(UUID, "secret")).await;
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({
                "success": true,
                "profileId": "new",
                "categories": ["Weapons"],
                "counts": { "donated": 1, "total": 2, "completionPct": 50 },
                "missing": [{ "category": "Weapons", "name": "Sword B" }],
                "hints": [],
                "raw": museum
            })
        );
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![format!("profiles:{UUID}"), "museum:new".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_input_makes_no_upstream_calls() {
        let api = Arc::new(StubApi::default());
        let service = MuseumService::new(api.clone(), weapons_dataset(), None);

        let response = service.handle(&request(UUID, "")).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "uuid and apiKey are required");

        let response = service.handle(&MuseumRequest::default()).await;
        assert_eq!(response.status, 400);
        assert!(api.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsuccessful_profiles_surface_upstream_details() {
        let details = json!({ "success": false, "cause": "Invalid API key" });
        let api = Arc::new(StubApi {
            profiles: Some(details.clone()),
            ..Default::default()
        });
        let service = MuseumService::new(api, weapons_dataset(), None);

        let response = service.handle(&request(UUID, "bad")).await;
        assert_eq!(response.status, 502);
        assert_eq!(response.body["error"], "Failed to fetch profiles");
        assert_eq!(response.body["details"], details);
    }

    #[tokio::test]
    async fn unsuccessful_museum_is_upstream_error() {
        let api = Arc::new(StubApi {
            profiles: Some(profiles_ok()),
            museum: Some(json!({ "success": false })),
            ..Default::default()
        });
        let service = MuseumService::new(api, weapons_dataset(), None);

        let response = service.handle(&request(UUID, "k")).await;
        assert_eq!(response.status, 502);
        assert_eq!(response.body["error"], "Failed to fetch museum");
    }

    #[tokio::test]
    async fn no_profiles_is_not_found() {
        let api = Arc::new(StubApi {
            profiles: Some(json!({ "success": true, "profiles": null })),
            ..Default::default()
        });
        let service = MuseumService::new(api.clone(), weapons_dataset(), None);

        let response = service.handle(&request(UUID, "k")).await;
        assert_eq!(response.status, 404);
        assert_eq!(api.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_server_error() {
        let api = Arc::new(StubApi::default());
        let service = MuseumService::new(api, weapons_dataset(), None);

        let response = service.handle(&request(UUID, "k")).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "Unexpected server error");
        assert!(
            response.body["details"]
                .as_str()
                .unwrap()
                .contains("connection reset")
        );
    }

    #[tokio::test]
    async fn empty_dataset_still_succeeds_with_hint() {
        let api = Arc::new(StubApi {
            profiles: Some(profiles_ok()),
            museum: Some(json!({ "success": true, "profile": { "special": [{ "name": "Prism" }] } })),
            ..Default::default()
        });
        let service = MuseumService::new(api, Arc::new(MuseumDataset::empty()), None);

        let response = service.handle(&request(UUID, "k")).await;
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body["counts"],
            json!({ "donated": 1, "total": null, "completionPct": null })
        );
        assert_eq!(response.body["hints"].as_array().unwrap().len(), 1);
        assert_eq!(response.body["missing"], json!([]));
    }

    #[tokio::test]
    async fn successful_fetch_writes_payload_log() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(StubApi {
            profiles: Some(profiles_ok()),
            museum: Some(json!({ "success": true })),
            ..Default::default()
        });
        let log = PayloadLog::new(dir.path().join("logs"));
        let service = MuseumService::new(api, weapons_dataset(), Some(log));

        let response = service.handle(&request(UUID, "k")).await;
        assert_eq!(response.status, 200);

        let files: Vec<_> = std::fs::read_dir(dir.path().join("logs")).unwrap().collect();
        assert_eq!(files.len(), 1);
        let name = files[0].as_ref().unwrap().file_name().into_string().unwrap();
        assert!(name.starts_with(&format!("museum_{UUID}_new_")));
    }
}
