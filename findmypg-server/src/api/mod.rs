//! API Module
//!
//! HTTP API layer for the listing server.
//! Each submodule handles endpoints for a specific domain.

pub mod account;
pub mod booking;
pub mod error;
pub mod extract;
pub mod health;
pub mod listing;
pub mod saved;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::storage::ImageStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub images: Arc<dyn ImageStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: PgPool, images: Arc<dyn ImageStore>, config: Config) -> Self {
        Self {
            pool,
            images,
            config: Arc::new(config),
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();
    let body_limit = state.config.max_body_bytes;

    let api = Router::new()
        // Listing endpoints
        .route("/getData", get(listing::get_data))
        .route("/getPG_Details", get(listing::get_pg_details))
        .route("/addPG", post(listing::add_pg))
        .route("/updatePG", post(listing::update_pg))
        .route("/deletePG", post(listing::delete_pg))
        .route("/addRoom", post(listing::add_room))
        .route("/updateRoom", post(listing::update_room))
        // Account endpoints
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/getOwner", get(account::get_owner))
        .route("/getUser", get(account::get_user))
        .route("/updateOwner", post(account::update_owner))
        .route("/updateUser", post(account::update_user))
        // Booking endpoints
        .route("/bookRoom", post(booking::book_room))
        .route("/get_bookRoom", get(booking::get_user_bookings))
        .route("/get_owner_bookRoom", get(booking::get_owner_bookings))
        .route(
            "/update_booking_status",
            post(booking::update_booking_status),
        )
        // Saved PG endpoints
        .route("/save_pg", post(saved::save_pg))
        .route("/unsave_pg", post(saved::unsave_pg))
        .route("/get_saved_pgs", get(saved::get_saved_pgs))
        .route("/get_saved_pg_details", get(saved::get_saved_pg_details));

    Router::new()
        // Health checks
        .route("/health", get(health::health_check))
        .route("/health/db", get(health::database_check))
        .nest("/api", api)
        // Locally stored images
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        response::Response,
    };
    use sqlx::postgres::PgPoolOptions;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::storage::local::LocalImageStore;
    use crate::storage::{ImageFolder, UploadedImage};

    const BOUNDARY: &str = "findmypg-test-boundary";

    /// Router over a pool that never connects; every request below is
    /// answered before the database would be touched
    fn app(dir: &TempDir) -> Router {
        let config = Config {
            upload_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let images = Arc::new(LocalImageStore::new(
            config.upload_dir.clone(),
            &config.public_base_url,
        ));

        create_router(AppState::new(pool, images, config))
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// `fields` are text parts; `files` are (field, file name, content type, bytes)
    fn post_multipart(
        uri: &str,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &str, &[u8])],
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, file_name, content_type, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn assert_bad_request(app: &Router, request: Request<Body>, message: &str) {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], message);
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(get("/health", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let dir = TempDir::new().unwrap();
        let response = app(&dir)
            .oneshot(get("/api/nope", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_header_ids_are_validated() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        assert_bad_request(
            &app,
            get("/api/getPG_Details", &[]),
            "Invalid or missing owner_id or pg_id",
        )
        .await;
        assert_bad_request(
            &app,
            get("/api/getPG_Details", &[("owner_id", "abc")]),
            "Invalid owner_id header",
        )
        .await;
        assert_bad_request(&app, get("/api/getOwner", &[]), "Missing owner_id header").await;
        assert_bad_request(&app, get("/api/getUser", &[]), "Missing user_id header").await;
        assert_bad_request(&app, get("/api/get_bookRoom", &[]), "Missing user-id header").await;
        assert_bad_request(
            &app,
            get("/api/get_owner_bookRoom", &[]),
            "Missing owner_id header",
        )
        .await;
        assert_bad_request(&app, get("/api/get_saved_pgs", &[]), "Missing user_id header").await;
    }

    #[tokio::test]
    async fn test_saved_pg_details_query_errors_are_json() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        assert_bad_request(
            &app,
            get("/api/get_saved_pg_details", &[]),
            "Missing user_id parameter",
        )
        .await;
        assert_bad_request(
            &app,
            get("/api/get_saved_pg_details?user_id=", &[]),
            "Missing user_id parameter",
        )
        .await;
        assert_bad_request(
            &app,
            get("/api/get_saved_pg_details?user_id=x", &[]),
            "Invalid user_id parameter",
        )
        .await;

        let response = app
            .clone()
            .oneshot(get("/api/get_saved_pg_details?user_id=1&user_id=2", &[]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid query string")
        );
    }

    #[tokio::test]
    async fn test_delete_requires_id_and_known_target() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let request = Request::builder()
            .method("POST")
            .uri("/api/deletePG")
            .body(Body::empty())
            .unwrap();
        assert_bad_request(&app, request, "Missing id header").await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/deletePG")
            .header("id", "4")
            .header("target", "house")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_account_validation() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        assert_bad_request(
            &app,
            post_json(
                "/api/register",
                r#"{"userType": "owner", "name": "Asha", "email": "asha@example.com"}"#,
            ),
            "Name, email and password are required",
        )
        .await;

        let response = app
            .clone()
            .oneshot(post_json("/api/login", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["success"], false);

        assert_bad_request(
            &app,
            post_multipart("/api/updateOwner", &[("id", "3"), ("name", "Asha")], &[]),
            "Missing required fields",
        )
        .await;
        assert_bad_request(
            &app,
            post_multipart("/api/updateUser", &[("id", "3")], &[]),
            "All fields are required",
        )
        .await;
    }

    #[tokio::test]
    async fn test_booking_validation() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        assert_bad_request(
            &app,
            post_json(
                "/api/bookRoom",
                r#"{"userId": 5, "checkInDate": "2024-06-01", "checkOutDate": "2024-09-01"}"#,
            ),
            "userId and pgId are required",
        )
        .await;
        assert_bad_request(
            &app,
            post_json(
                "/api/bookRoom",
                r#"{"userId": 5, "pgId": 3, "checkInDate": "2024-06-01", "checkOutDate": "2024-05-01"}"#,
            ),
            "checkOutDate cannot be before checkInDate",
        )
        .await;
        assert_bad_request(
            &app,
            post_json("/api/update_booking_status", r#"{"booking_id": 2}"#),
            "Missing booking_id or status.",
        )
        .await;
    }

    #[tokio::test]
    async fn test_saved_validation() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        assert_bad_request(
            &app,
            post_json("/api/save_pg", r#"{"user_id": 1}"#),
            "Invalid input",
        )
        .await;
        assert_bad_request(
            &app,
            post_json("/api/unsave_pg", r#"{"pg_id": "7"}"#),
            "Invalid input",
        )
        .await;
    }

    #[tokio::test]
    async fn test_listing_form_validation() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        assert_bad_request(
            &app,
            post_multipart("/api/addPG", &[], &[]),
            "PG data not provided",
        )
        .await;
        assert_bad_request(
            &app,
            post_multipart("/api/addPG", &[("data", "{broken")], &[]),
            "Invalid JSON data format",
        )
        .await;
        assert_bad_request(
            &app,
            post_multipart("/api/addPG", &[("data", r#"{"pg_name": "Sunrise"}"#)], &[]),
            "owner_id is required",
        )
        .await;
        assert_bad_request(
            &app,
            post_multipart(
                "/api/addPG",
                &[("data", r#"{"owner_id": 1, "pg_name": "Sunrise"}"#)],
                &[("images[]", "notes.txt", "text/plain", &b"hello"[..])],
            ),
            "Only image files are allowed!",
        )
        .await;
        assert_bad_request(
            &app,
            post_multipart("/api/addRoom", &[("data", r#"{"pg_id": 1}"#)], &[]),
            "Missing required fields",
        )
        .await;
        assert_bad_request(
            &app,
            post_multipart("/api/updateRoom", &[], &[]),
            "Room data not provided",
        )
        .await;
        assert_bad_request(
            &app,
            post_multipart("/api/updateRoom", &[("data", r#"{"pg_id": 1}"#)], &[]),
            "PG ID or Room ID not provided",
        )
        .await;

        let request = post_multipart("/api/updatePG", &[], &[]);
        assert_bad_request(&app, request, "Missing pg_id header").await;

        // nothing was written for the rejected uploads
        assert!(!dir.path().join("pgImages").exists());
    }

    #[tokio::test]
    async fn test_json_routes_reject_other_content() {
        let dir = TempDir::new().unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/register")
            .body(Body::from("name=Asha"))
            .unwrap();

        let response = app(&dir).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_serves_stored_uploads() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let config = Config::default();
        let store = LocalImageStore::new(dir.path().to_path_buf(), &config.public_base_url);
        let url = store
            .store(
                ImageFolder::PgImages,
                &UploadedImage {
                    file_name: "front.png".to_string(),
                    content_type: Some("image/png".to_string()),
                    bytes: b"png-bytes".to_vec(),
                },
            )
            .await
            .unwrap();

        let path = url.strip_prefix(&config.public_base_url).unwrap();
        let response = app.oneshot(get(path, &[])).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"png-bytes");
    }
}
