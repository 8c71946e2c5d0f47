//! HTTP handlers for the Catalogue API
//!
//! Every route is scoped to a session so the viewer's role and filters
//! apply:
//! - GET  /api/v1/sessions/:id/categories          - categories listed for the viewer
//! - GET  /api/v1/sessions/:id/categories/allowed  - categories the viewer may publish into
//! - GET  /api/v1/sessions/:id/resources           - query engine result
//! - GET  /api/v1/sessions/:id/resources/:rid      - resource detail
//! - POST /api/v1/sessions/:id/resources           - create resource

use crate::catalogue::policy;
use crate::catalogue::store::CatalogueStore;
use crate::catalogue::types::*;
use crate::error::ApiError;
use crate::session::handler::session_error_response;
use crate::session::manager::SessionManager;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for catalogue handlers
#[derive(Clone)]
pub struct CatalogueState {
    pub store: Arc<CatalogueStore>,
    pub sessions: Arc<SessionManager>,
}

/// Create the catalogue router
pub fn catalogue_router(state: CatalogueState) -> Router {
    Router::new()
        .route("/api/v1/sessions/:id/categories", get(list_categories))
        .route(
            "/api/v1/sessions/:id/categories/allowed",
            get(list_allowed_categories),
        )
        .route(
            "/api/v1/sessions/:id/resources",
            get(list_resources).post(create_resource),
        )
        .route("/api/v1/sessions/:id/resources/:rid", get(get_resource))
        .with_state(state)
}

/// One-off overrides of the session's stored view
#[derive(Debug, Deserialize)]
struct ListResourcesQuery {
    category: Option<String>,
    q: Option<String>,
}

/// GET /api/v1/sessions/:id/categories
async fn list_categories(
    State(state): State<CatalogueState>,
    Path(id): Path<String>,
) -> Response {
    match state.sessions.viewer(&id).await {
        Ok(viewer) => Json(policy::listed_categories(
            state.store.categories(),
            viewer.identity.effective_role(),
        ))
        .into_response(),
        Err(err) => session_error_response(err),
    }
}

/// GET /api/v1/sessions/:id/categories/allowed
async fn list_allowed_categories(
    State(state): State<CatalogueState>,
    Path(id): Path<String>,
) -> Response {
    match state.sessions.viewer(&id).await {
        Ok(viewer) => {
            let allowed = policy::allowed_categories(viewer.identity.role());
            let categories: Vec<Category> = state
                .store
                .categories()
                .iter()
                .filter(|c| allowed.contains(&c.id))
                .cloned()
                .collect();
            Json(categories).into_response()
        }
        Err(err) => session_error_response(err),
    }
}

/// GET /api/v1/sessions/:id/resources
async fn list_resources(
    State(state): State<CatalogueState>,
    Path(id): Path<String>,
    Query(params): Query<ListResourcesQuery>,
) -> Response {
    let viewer = match state.sessions.viewer(&id).await {
        Ok(viewer) => viewer,
        Err(err) => return session_error_response(err),
    };

    let active_category = match params.category.as_deref() {
        Some(raw) => match raw.parse::<ActiveCategory>() {
            Ok(category) => category,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(e))).into_response()
            }
        },
        None => viewer.view.active_category,
    };
    let search_term = params.q.unwrap_or(viewer.view.search_term);

    let data = state
        .store
        .query(viewer.identity.effective_role(), active_category, &search_term)
        .await;

    Json(ResourceListing {
        heading: state.store.heading(active_category),
        active_category,
        search_term,
        total: data.len(),
        data,
    })
    .into_response()
}

/// GET /api/v1/sessions/:id/resources/:rid
///
/// Restricted resources are reported as missing.
async fn get_resource(
    State(state): State<CatalogueState>,
    Path((id, rid)): Path<(String, String)>,
) -> Response {
    let viewer = match state.sessions.viewer(&id).await {
        Ok(viewer) => viewer,
        Err(err) => return session_error_response(err),
    };

    match state
        .store
        .get_visible(&rid, viewer.identity.effective_role())
        .await
    {
        Some(resource) => Json(resource).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError::not_found(format!("Resource '{}' not found", rid))),
        )
            .into_response(),
    }
}

/// POST /api/v1/sessions/:id/resources
async fn create_resource(
    State(state): State<CatalogueState>,
    Path(id): Path<String>,
    Json(request): Json<CreateResourceRequest>,
) -> Response {
    let viewer = match state.sessions.viewer(&id).await {
        Ok(viewer) => viewer,
        Err(err) => return session_error_response(err),
    };

    let author = viewer.identity.display_name().unwrap_or_default().to_string();
    match state
        .store
        .create(request, viewer.identity.role(), &author)
        .await
    {
        Ok(resource) => (StatusCode::CREATED, Json(resource)).into_response(),
        Err(err) if err.is_forbidden() => {
            tracing::warn!(session = %id, "Resource creation refused: {}", err);
            (StatusCode::FORBIDDEN, Json(ApiError::forbidden(err.to_string()))).into_response()
        }
        Err(err) => {
            (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(err.to_string()))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::session::auth::StaticCredentials;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        sessions: Arc<SessionManager>,
    }

    fn make_app() -> Harness {
        let verifier = Arc::new(StaticCredentials::new(AuthConfig::demo().accounts));
        let sessions = Arc::new(SessionManager::new(verifier));
        let store = Arc::new(CatalogueStore::with_seed().unwrap());
        let app = catalogue_router(CatalogueState {
            store,
            sessions: sessions.clone(),
        });
        Harness { app, sessions }
    }

    async fn session_as(harness: &Harness, login: Option<(&str, &str)>) -> String {
        let id = harness.sessions.create().await.id;
        if let Some((username, password)) = login {
            harness.sessions.login(&id, username, password).await.unwrap();
        }
        id
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn ids(json: &serde_json::Value) -> Vec<String> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_anonymous_listing() {
        let harness = make_app();
        let id = session_as(&harness, None).await;

        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/resources", id)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["heading"]["label"], "Vista General");
        assert_eq!(json["activeCategory"], "all");
        assert_eq!(json["total"], 8);
        assert!(!ids(&json).contains(&"7".to_string()));
    }

    #[tokio::test]
    async fn test_listing_uses_session_view() {
        let harness = make_app();
        let id = session_as(&harness, Some(("alumno", "1234"))).await;
        harness
            .sessions
            .update_view(
                &id,
                crate::session::types::UpdateViewRequest {
                    category: Some(ActiveCategory::Only(CategoryId::Ingles)),
                    search_term: None,
                },
            )
            .await
            .unwrap();

        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/resources", id)).await;
        let json = body_json(resp).await;
        assert_eq!(ids(&json), vec!["4", "4b", "4c"]);
        assert_eq!(json["heading"]["label"], "English & Foreign Lang");
    }

    #[tokio::test]
    async fn test_listing_overrides() {
        let harness = make_app();
        let id = session_as(&harness, None).await;

        let resp = get(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources?category=social&q=EUROPA", id),
        )
        .await;
        let json = body_json(resp).await;
        assert_eq!(ids(&json), vec!["5"]);
        assert_eq!(json["searchTerm"], "EUROPA");

        let resp = get(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources?category=general", id),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_teachers_lounge_hidden_from_parents() {
        let harness = make_app();
        let parent = session_as(&harness, Some(("padre", "1234"))).await;
        let teacher = session_as(&harness, Some(("profesor", "admin"))).await;

        let resp = get(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources?category=profesores", parent),
        )
        .await;
        assert_eq!(body_json(resp).await["total"], 0);

        let resp = get(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources?category=profesores", teacher),
        )
        .await;
        assert_eq!(body_json(resp).await["total"], 2);

        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/categories", parent)).await;
        let json = body_json(resp).await;
        let listed = json.as_array().unwrap();
        assert_eq!(listed.len(), 6);
        assert!(listed.iter().all(|c| c["id"] != "profesores"));

        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/categories", teacher)).await;
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_restricted_resource_reported_missing() {
        let harness = make_app();
        let parent = session_as(&harness, None).await;
        let teacher = session_as(&harness, Some(("profesor", "admin"))).await;

        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/resources/7", parent)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/resources/7", teacher)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["minRole"], "TEACHER");
    }

    #[tokio::test]
    async fn test_allowed_categories() {
        let harness = make_app();
        let ampa = session_as(&harness, Some(("ampa", "ampa"))).await;
        let student = session_as(&harness, Some(("alumno", "1234"))).await;

        let resp = get(
            &harness.app,
            &format!("/api/v1/sessions/{}/categories/allowed", ampa),
        )
        .await;
        let json = body_json(resp).await;
        let mut allowed: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        allowed.sort();
        assert_eq!(allowed, vec!["cultural", "extraescolar", "social"]);

        let resp = get(
            &harness.app,
            &format!("/api/v1/sessions/{}/categories/allowed", student),
        )
        .await;
        assert!(body_json(resp).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ampa_creates_cultural_resource() {
        let harness = make_app();
        let id = session_as(&harness, Some(("ampa", "ampa"))).await;

        let resp = post_json(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources", id),
            serde_json::json!({
                "title": "Visita al Museo",
                "description": "Salida al museo de ciencias",
                "categoryId": "cultural",
                "type": "EVENT",
                "tags": "museo, ciencias"
            }),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        assert_eq!(created["minRole"], "PARENT");
        assert_eq!(created["author"], "Admin AMPA");
        assert_eq!(created["isFeatured"], false);
        assert_eq!(created["tags"], serde_json::json!(["museo", "ciencias"]));

        // First in the next listing
        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/resources", id)).await;
        let json = body_json(resp).await;
        assert_eq!(json["data"][0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_creation_refusals() {
        let harness = make_app();
        let ampa = session_as(&harness, Some(("ampa", "ampa"))).await;
        let parent = session_as(&harness, Some(("padre", "1234"))).await;
        let teacher = session_as(&harness, Some(("profesor", "admin"))).await;

        let form = serde_json::json!({
            "title": "Dictado",
            "description": "Ortografía",
            "categoryId": "castellano"
        });

        let resp = post_json(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources", ampa),
            form.clone(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = post_json(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources", parent),
            form,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = post_json(
            &harness.app,
            &format!("/api/v1/sessions/{}/resources", teacher),
            serde_json::json!({"title": "", "description": "x", "categoryId": "social"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "BAD_REQUEST");

        // Nothing was added
        let resp = get(&harness.app, &format!("/api/v1/sessions/{}/resources", teacher)).await;
        assert_eq!(body_json(resp).await["total"], 10);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let harness = make_app();
        let resp = get(&harness.app, "/api/v1/sessions/ghost/resources").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
