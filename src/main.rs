use axum::{
    routing::{get, post},
    Router,
};
use quizmaster_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    app_state
        .user_service
        .ensure_default_admin(
            &config.admin_username,
            &config.admin_email,
            &config.admin_password,
        )
        .await?;

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let auth_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

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
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.admin_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let user_api = Router::new()
        .route("/api/user/dashboard", get(routes::user::dashboard))
        .route("/api/user/quizzes", get(routes::user::list_quizzes))
        .route("/api/user/quizzes/:id", get(routes::user::take_quiz))
        .route(
            "/api/user/quizzes/:id/submit",
            post(routes::user::submit_quiz),
        )
        .route("/api/user/scores", get(routes::user::my_scores))
        .layer(axum::middleware::from_fn(middleware::auth::require_user))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.public_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(auth_api)
        .merge(admin_api)
        .merge(user_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
