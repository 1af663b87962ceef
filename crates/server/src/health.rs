use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use mtr_core::source::PropertySource;
use serde::Serialize;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub properties: HealthCheck,
    pub tools: Vec<String>,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let properties = property_check(state.desk.properties().as_ref()).await;
    let ready = properties.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "mtr-server runtime initialized".to_string(),
        },
        properties,
        tools: state.tools.names().into_iter().map(str::to_string).collect(),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn property_check(source: &dyn PropertySource) -> HealthCheck {
    match source.load().await {
        Ok(records) => HealthCheck {
            status: "ready",
            detail: format!("{} source returned {} properties", source.kind(), records.len()),
        },
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("{} source failed: {error}", source.kind()),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, Json};
    use mtr_agent::{AgentProfile, LeasingDesk, ToolRegistry};
    use mtr_core::source::{PropertySource, StaticListSource};
    use mtr_db::{connect_with_settings, InMemoryLeadRepository, TableSource};

    use crate::health::health;
    use crate::routes::AppState;

    fn state_with(source: Arc<dyn PropertySource>) -> AppState {
        let desk =
            Arc::new(LeasingDesk::new(source, Arc::new(InMemoryLeadRepository::default())));
        let tools = Arc::new(ToolRegistry::leasing(desk.clone()));
        let profile = Arc::new(AgentProfile::leasing(&tools));
        AppState { desk, tools, profile }
    }

    #[tokio::test]
    async fn health_returns_ready_for_the_builtin_catalog() {
        let state = state_with(Arc::new(StaticListSource::default()));

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.properties.detail, "static source returned 2 properties");
        assert_eq!(payload.tools.len(), 4);
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_table_is_unreachable() {
        let pool =
            connect_with_settings("sqlite::memory:", 1, 5).await.expect("pool should connect");
        pool.close().await;
        let state = state_with(Arc::new(TableSource::new(pool, "PropertyContext")));

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.properties.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_reports_unconfigured_table_source() {
        let state = state_with(Arc::new(TableSource::unconfigured("PropertyContext")));

        let (status, Json(payload)) = health(State(state)).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(payload.properties.detail.contains("not configured"));
    }
}
