use crate::config::PartnersConfig;
use crate::core::query::{QueryBuilder, QueryTarget};
use crate::domain::event_type::EventType;
use crate::domain::ports::GraphqlTransport;
use serde::Serialize;
use std::fmt;

/// 連線檢查結果；失敗原因直接顯示給使用者
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Succeeded,
    Failed { reason: String },
}

impl CheckStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckStatus::Succeeded)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Succeeded => f.write_str("SUCCEEDED"),
            CheckStatus::Failed { reason } => write!(f, "FAILED: {}", reason),
        }
    }
}

/// Verifies credentials and application id with one installs query.
pub struct ConnectionProbe;

impl ConnectionProbe {
    /// Never returns an error: transport failures and API-reported errors both
    /// become `CheckStatus::Failed`.
    pub async fn check<T: GraphqlTransport>(config: &PartnersConfig, transport: &T) -> CheckStatus {
        let request = QueryBuilder::new(config.app_gid()).build(
            &QueryTarget::event(EventType::RelationshipInstalled),
            config.num_results_per_call,
            None,
        );

        tracing::debug!("🔌 Probing {}", config.endpoint());

        match transport.post(&request).await {
            Ok(body) => match body.get("error") {
                Some(error) => {
                    let reason = match error.as_str() {
                        Some(message) => message.to_string(),
                        None => error.to_string(),
                    };
                    tracing::error!("❌ Connection check rejected: {}", reason);
                    CheckStatus::Failed { reason }
                }
                None => {
                    tracing::info!("✅ Connection check succeeded");
                    CheckStatus::Succeeded
                }
            },
            Err(e) => {
                tracing::error!("❌ Connection check failed: {}", e);
                CheckStatus::Failed {
                    reason: format!("Unable to connect to the shopify partners api :: {}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RecordLayout, DEFAULT_BASE_URL};
    use crate::domain::model::QueryRequest;
    use crate::utils::error::{EtlError, Result};
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct FixedTransport {
        response: Mutex<Option<Result<Value>>>,
        seen: Mutex<Vec<QueryRequest>>,
    }

    impl FixedTransport {
        fn new(response: Result<Value>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl GraphqlTransport for FixedTransport {
        async fn post(&self, request: &QueryRequest) -> Result<Value> {
            self.seen.lock().unwrap().push(request.clone());
            self.response.lock().unwrap().take().unwrap()
        }
    }

    fn config() -> PartnersConfig {
        PartnersConfig {
            api_key: "k".to_string(),
            api_version: "2024-01".to_string(),
            partner_id: "1".to_string(),
            application_id: "9".to_string(),
            num_results_per_call: 7,
            base_url: DEFAULT_BASE_URL.to_string(),
            record_layout: RecordLayout::Flat,
        }
    }

    #[tokio::test]
    async fn test_check_succeeds_on_data_body() {
        let transport = FixedTransport::new(Ok(json!({"data": {"app": {"events": {}}}})));

        let status = ConnectionProbe::check(&config(), &transport).await;

        assert_eq!(status, CheckStatus::Succeeded);
        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].query.contains("types: [RELATIONSHIP_INSTALLED]"));
        assert_eq!(seen[0].variables.first, 7);
        assert_eq!(seen[0].variables.app_id, "gid://partners/App/9");
        assert_eq!(seen[0].variables.after, None);
    }

    #[tokio::test]
    async fn test_check_reports_error_field() {
        let transport = FixedTransport::new(Ok(json!({"error": "invalid token"})));

        let status = ConnectionProbe::check(&config(), &transport).await;

        assert_eq!(
            status,
            CheckStatus::Failed {
                reason: "invalid token".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_check_keeps_structured_error_as_json() {
        let transport = FixedTransport::new(Ok(json!({"error": {"code": 401}})));

        let status = ConnectionProbe::check(&config(), &transport).await;

        assert_eq!(
            status,
            CheckStatus::Failed {
                reason: r#"{"code":401}"#.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_check_wraps_transport_failure() {
        let transport = FixedTransport::new(Err(EtlError::HttpStatusError {
            status: 503,
            body: "down".to_string(),
        }));

        let status = ConnectionProbe::check(&config(), &transport).await;

        match status {
            CheckStatus::Failed { reason } => {
                assert!(reason.starts_with("Unable to connect to the shopify partners api :: "));
                assert!(reason.contains("503"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_status_serializes_with_tag() {
        assert_eq!(
            serde_json::to_value(CheckStatus::Failed {
                reason: "nope".to_string()
            })
            .unwrap(),
            json!({"status": "FAILED", "reason": "nope"})
        );
        assert_eq!(CheckStatus::Succeeded.to_string(), "SUCCEEDED");
    }
}
