use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mtr_agent::{AgentProfile, LeasingDesk, ToolRegistry};
use mtr_core::errors::InterfaceError;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub desk: Arc<LeasingDesk>,
    pub tools: Arc<ToolRegistry>,
    pub profile: Arc<AgentProfile>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    pub tool: String,
    pub output: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: &'static str,
    pub detail: String,
    pub correlation_id: String,
}

/// `InterfaceError` rendered as a JSON response.
pub struct ApiError(pub InterfaceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            InterfaceError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            InterfaceError::UnknownTool { .. } => (StatusCode::NOT_FOUND, "unknown_tool"),
            InterfaceError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = ErrorBody {
            error: kind,
            message: self.0.user_message(),
            detail: self.0.to_string(),
            correlation_id: self.0.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/agent", get(agent_profile))
        .route("/tools/{name}", post(call_tool))
        .with_state(state)
}

pub async fn agent_profile(State(state): State<AppState>) -> Json<AgentProfile> {
    Json(state.profile.as_ref().clone())
}

pub async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let Some(tool) = state.tools.get(&name) else {
        warn!(
            event_name = "agent.tool.unknown",
            correlation_id = %correlation_id,
            tool = %name,
            "unknown tool requested"
        );
        return Err(ApiError(InterfaceError::UnknownTool { tool: name, correlation_id }));
    };

    let input = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&body).map_err(|error| {
            ApiError(InterfaceError::BadRequest {
                message: format!("request body is not valid JSON: {error}"),
                correlation_id: correlation_id.clone(),
            })
        })?
    };

    let output = tool.execute(input).await.map_err(|error| {
        warn!(
            event_name = "agent.tool.rejected",
            correlation_id = %correlation_id,
            tool = %name,
            error = %error,
            "tool call rejected"
        );
        ApiError(InterfaceError::BadRequest {
            message: error.to_string(),
            correlation_id: correlation_id.clone(),
        })
    })?;

    let output = match output {
        Value::String(text) => text,
        other => other.to_string(),
    };
    info!(
        event_name = "agent.tool.completed",
        correlation_id = %correlation_id,
        tool = %name,
        output_chars = output.chars().count(),
        "tool call completed"
    );

    Ok(Json(ToolResponse { tool: name, output }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use mtr_agent::{AgentProfile, LeasingDesk, ToolRegistry};
    use mtr_core::source::StaticListSource;
    use mtr_db::{InMemoryLeadRepository, LeadRepository};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{router, AppState};

    fn state() -> (AppState, Arc<InMemoryLeadRepository>) {
        let leads = Arc::new(InMemoryLeadRepository::default());
        let source = Arc::new(StaticListSource::default());
        let desk = Arc::new(LeasingDesk::new(source, leads.clone()));
        let tools = Arc::new(ToolRegistry::leasing(desk.clone()));
        let profile = Arc::new(AgentProfile::leasing(&tools));
        (AppState { desk, tools, profile }, leads)
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body bytes");
        let payload = serde_json::from_slice(&bytes).expect("json body");
        (status, payload)
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn tool_route_returns_the_spoken_answer() {
        let (state, _) = state();
        let (status, payload) =
            send(state, post("/tools/get_property_info", r#"{"property_name":"studio"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["tool"], "get_property_info");
        let output = payload["output"].as_str().expect("output is a string");
        assert!(output.starts_with("Blue Door Studio Downtown Lander Loft"));
    }

    #[tokio::test]
    async fn tool_route_accepts_an_empty_body() {
        let (state, _) = state();
        let (status, payload) = send(state, post("/tools/list_available_properties", "")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(payload["output"].as_str().unwrap_or_default().contains("Boulder, Colorado"));
    }

    #[tokio::test]
    async fn save_lead_route_stores_the_lead() {
        let (state, leads) = state();
        let (status, payload) = send(
            state,
            post("/tools/save_lead", r#"{"name":"Jane","email":"jane@x.com","notes":7}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(payload["output"].as_str().unwrap_or_default().contains("jane@x.com"));
        assert_eq!(leads.len().await.expect("count leads"), 1);
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let (state, _) = state();
        let (status, payload) = send(state, post("/tools/book_viewing", "{}")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(payload["error"], "unknown_tool");
        assert_eq!(payload["detail"], "unknown tool: book_viewing");
        assert!(payload["correlation_id"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn malformed_arguments_are_bad_requests() {
        let (state, _) = state();
        let (status, payload) = send(state.clone(), post("/tools/save_lead", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "bad_request");

        let (status, _) = send(state, post("/tools/save_lead", "[1, 2]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn agent_route_serves_the_profile() {
        let (state, _) = state();
        let request = Request::get("/agent").body(Body::empty()).expect("request builds");
        let (status, payload) = send(state, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["tools"].as_array().map(Vec::len), Some(4));
        assert!(payload["greeting"].as_str().is_some());
    }
}
