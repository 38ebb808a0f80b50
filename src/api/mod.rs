mod handlers;

use axum::{
    http::HeaderValue,
    routing::{get, put},
    Router,
};
use notekeep_core::Database;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Router with permissive CORS, as used for local serving and tests.
pub fn create_router(db: Database) -> Router {
    create_router_with_cors(db, None)
}

/// Router that only admits the given browser origins, or any origin when
/// `cors_origins` is `None`.
pub fn create_router_with_cors(db: Database, cors_origins: Option<&[String]>) -> Router {
    let api = Router::new()
        // Health
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        // Folders
        .route(
            "/folders",
            get(handlers::list_folders).post(handlers::create_folder),
        )
        .route(
            "/folders/{id}",
            put(handlers::rename_folder).delete(handlers::delete_folder),
        )
        // Tags
        .route("/tags", get(handlers::list_tags).post(handlers::create_tag))
        // Notes
        .route("/notes", get(handlers::list_notes).post(handlers::create_note))
        .route(
            "/notes/{id}",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .route("/notes/{id}/history", get(handlers::get_note_history));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(db)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn setup(origins: Option<&[String]>) -> Router {
        let db = Database::open_memory().expect("Failed to create database");
        db.ensure_schema().expect("Failed to migrate");
        create_router_with_cors(db, origins)
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let response = setup(None)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn configured_origins_are_echoed() {
        let origins = vec!["http://localhost:3000".to_string()];
        let response = setup(Some(&origins))
            .oneshot(
                Request::get("/api/health")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:3000"))
        );
    }

    #[tokio::test]
    async fn unknown_origins_get_no_cors_header() {
        let origins = vec!["http://localhost:3000".to_string()];
        let response = setup(Some(&origins))
            .oneshot(
                Request::get("/api/health")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
