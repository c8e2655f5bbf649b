use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request},
    response::Response,
    routing::{get, post},
    Router,
};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use quizmaster_backend::{middleware, routes, AppState};

/// Initializes config + pool + migrations for an integration test. Returns
/// `None` (and the test should bail out) when no database is configured.
pub async fn setup() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("skipping: DATABASE_URL is not set");
        return None;
    }
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("TOKEN_TTL_HOURS", "2");
    env::set_var("ADMIN_PASSWORD", "admin123");
    env::set_var("ADMIN_RPS", "1000");
    env::set_var("PUBLIC_RPS", "1000");

    // Tests in one binary share the process-wide config.
    let _ = quizmaster_backend::config::init_config();

    let pool = quizmaster_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    Some(pool)
}

/// The application router as served in production, minus rate limiting
/// (tests fire requests in tight loops).
pub fn app(pool: PgPool) -> Router {
    let state = AppState::new(pool);

    let base = Router::new().route("/health", get(routes::health::health));

    let auth_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login));

    let admin_api = Router::new()
        .route("/api/admin/dashboard", get(routes::admin::dashboard))
        .route(
            "/api/admin/subjects",
            get(routes::admin::list_subjects).post(routes::admin::create_subject),
        )
        .route(
            "/api/admin/subjects/:id",
            get(routes::admin::get_subject)
                .patch(routes::admin::update_subject)
                .delete(routes::admin::delete_subject),
        )
        .route(
            "/api/admin/subjects/:id/chapters",
            get(routes::admin::list_chapters).post(routes::admin::create_chapter),
        )
        .route(
            "/api/admin/chapters/:id",
            get(routes::admin::get_chapter)
                .patch(routes::admin::update_chapter)
                .delete(routes::admin::delete_chapter),
        )
        .route(
            "/api/admin/chapters/:id/quizzes",
            get(routes::admin::list_quizzes).post(routes::admin::create_quiz),
        )
        .route(
            "/api/admin/chapters/:id/quizzes/stats",
            get(routes::admin::chapter_quiz_stats),
        )
        .route(
            "/api/admin/quizzes/:id",
            get(routes::admin::get_quiz)
                .patch(routes::admin::update_quiz)
                .delete(routes::admin::delete_quiz),
        )
        .route(
            "/api/admin/quizzes/:id/questions",
            get(routes::admin::list_questions).post(routes::admin::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            get(routes::admin::get_question)
                .patch(routes::admin::update_question)
                .delete(routes::admin::delete_question),
        )
        .route("/api/admin/users", get(routes::admin::list_users))
        .route(
            "/api/admin/users/:id",
            get(routes::admin::get_user).delete(routes::admin::delete_user),
        )
        .route(
            "/api/admin/scores",
            get(routes::admin::list_scores).post(routes::admin::create_score),
        )
        .route(
            "/api/admin/scores/:id",
            get(routes::admin::get_score)
                .patch(routes::admin::update_score)
                .delete(routes::admin::delete_score),
        )
        .route("/api/admin/search", get(routes::admin::search))
        .layer(axum::middleware::from_fn(middleware::auth::require_admin));

    let user_api = Router::new()
        .route("/api/user/dashboard", get(routes::user::dashboard))
        .route("/api/user/quizzes", get(routes::user::list_quizzes))
        .route("/api/user/quizzes/:id", get(routes::user::take_quiz))
        .route(
            "/api/user/quizzes/:id/submit",
            post(routes::user::submit_quiz),
        )
        .route("/api/user/scores", get(routes::user::my_scores))
        .layer(axum::middleware::from_fn(middleware::auth::require_user));

    base.merge(auth_api)
        .merge(admin_api)
        .merge(user_api)
        .with_state(state)
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &JsonValue,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_json(response: Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
