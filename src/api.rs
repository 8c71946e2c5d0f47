//! Unified API router for EduNexus
//!
//! Merges all module routers into a single axum `Router` with CORS and
//! request tracing.
//!
//! ## Endpoint Map
//!
//! | Prefix                                   | Module    | Description                  |
//! |------------------------------------------|-----------|------------------------------|
//! | `/health`                                | api       | Liveness probe               |
//! | `/api/v1/sessions[/:id]`                 | session   | Create, login, logout, view  |
//! | `/api/v1/sessions/:id/categories*`       | catalogue | Listed and allowed categories|
//! | `/api/v1/sessions/:id/resources*`        | catalogue | Query, detail, create        |
//! | `/api/v1/sessions/:id/assistant/*`       | assistant | Conversation                 |

use crate::assistant::{assistant_router, client, AssistantBridge, AssistantState, BridgeSettings};
use crate::catalogue::{catalogue_router, CatalogueState, CatalogueStore};
use crate::config::PortalConfig;
use crate::error::Result;
use crate::session::{sessions_router, SessionManager, SessionsState, StaticCredentials};
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared subsystems behind the HTTP surface
#[derive(Clone)]
pub struct AppState {
    pub catalogue: Arc<CatalogueStore>,
    pub sessions: Arc<SessionManager>,
    pub bridge: Arc<AssistantBridge>,
}

impl AppState {
    /// Wire the seeded catalogue, the configured accounts and the assistant backend
    pub fn from_config(config: &PortalConfig) -> Result<Self> {
        let catalogue = Arc::new(CatalogueStore::with_seed()?);
        let verifier = Arc::new(StaticCredentials::new(config.auth.accounts.clone()));
        if verifier.is_empty() {
            tracing::warn!("No login accounts configured; every viewer stays anonymous");
        }
        let sessions = Arc::new(SessionManager::new(verifier));
        let bridge = Arc::new(AssistantBridge::new(
            client::from_config(&config.assistant)?,
            catalogue.clone(),
            BridgeSettings::from(&config.assistant),
        ));

        Ok(Self {
            catalogue,
            sessions,
            bridge,
        })
    }
}

/// Build the complete EduNexus HTTP application
pub fn build_app(state: &AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(sessions_router(SessionsState {
            manager: state.sessions.clone(),
        }))
        .merge(catalogue_router(CatalogueState {
            store: state.catalogue.clone(),
            sessions: state.sessions.clone(),
        }))
        .merge(assistant_router(AssistantState {
            bridge: state.bridge.clone(),
            sessions: state.sessions.clone(),
        }))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::bridge::tests::{fast_settings, ScriptedClient};
    use crate::config::AuthConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn make_state() -> AppState {
        let catalogue = Arc::new(CatalogueStore::with_seed().unwrap());
        let sessions = Arc::new(SessionManager::new(Arc::new(StaticCredentials::new(
            AuthConfig::demo().accounts,
        ))));
        let bridge = Arc::new(AssistantBridge::new(
            Arc::new(ScriptedClient::replying("Tenemos una visita al museo")),
            catalogue.clone(),
            fast_settings(),
        ));
        AppState {
            catalogue,
            sessions,
            bridge,
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> axum::response::Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = build_app(&make_state(), &[]);
        let resp = call(&app, "GET", "/health", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_portal_walkthrough() {
        let app = build_app(&make_state(), &[]);

        let resp = call(&app, "POST", "/api/v1/sessions", None).await;
        let id = body_json(resp).await["id"].as_str().unwrap().to_string();

        // Anonymous: no teachers' lounge, cannot publish
        let resp = call(&app, "GET", &format!("/api/v1/sessions/{}/resources", id), None).await;
        assert_eq!(body_json(resp).await["total"], 8);
        let resp = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{}/resources", id),
            Some(serde_json::json!({"title": "T", "description": "D", "categoryId": "cultural"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // AMPA publishes a cultural event
        let resp = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{}/login", id),
            Some(serde_json::json!({"username": "AMPA", "password": "ampa"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{}/resources", id),
            Some(serde_json::json!({
                "title": "Visita al Museo",
                "description": "Salida cultural de primavera",
                "categoryId": "cultural",
                "type": "EVENT"
            })),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        // Filter and search through the session view
        call(
            &app,
            "PUT",
            &format!("/api/v1/sessions/{}/view", id),
            Some(serde_json::json!({"category": "cultural", "searchTerm": "museo"})),
        )
        .await;
        let resp = call(&app, "GET", &format!("/api/v1/sessions/{}/resources", id), None).await;
        let json = body_json(resp).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["data"][0]["title"], "Visita al Museo");
        assert_eq!(json["heading"]["label"], "Actividades Culturales");

        // Ask the assistant
        let resp = call(
            &app,
            "POST",
            &format!("/api/v1/sessions/{}/assistant/messages", id),
            Some(serde_json::json!({"text": "¿Qué salidas hay?"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["reply"]["text"], "Tenemos una visita al museo");

        // Logout resets the category but keeps the conversation
        let resp = call(&app, "POST", &format!("/api/v1/sessions/{}/logout", id), None).await;
        assert_eq!(body_json(resp).await["view"]["activeCategory"], "all");
        let resp = call(
            &app,
            "GET",
            &format!("/api/v1/sessions/{}/assistant/messages", id),
            None,
        )
        .await;
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_app_state_from_default_config() {
        let state = AppState::from_config(&PortalConfig::default()).unwrap();
        assert_eq!(state.catalogue.categories().len(), 7);
    }

    #[test]
    fn test_app_state_rejects_unknown_provider() {
        let mut config = PortalConfig::default();
        config.assistant.provider = "unknown".to_string();
        assert!(AppState::from_config(&config).is_err());
    }

    #[test]
    fn test_build_cors_with_origins() {
        let _cors = build_cors(&[
            "http://localhost:5173".to_string(),
            "https://portal.example.com".to_string(),
        ]);
    }
}
