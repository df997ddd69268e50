use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use agora_api::auth::{self, AppState, AppStateInner};
use agora_api::middleware::require_auth;
use agora_api::{boards, comments, profile, users};
use agora_core::{BoardFeed, Boards, Cleanup, LikeLedger, Profiles, Sequences};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("AGORA_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("AGORA_DB_PATH").unwrap_or_else(|_| "agora.db".into());
    let host = std::env::var("AGORA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("AGORA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Store and services. Each service is handed its dependencies here,
    // so tests can assemble the same pieces over an in-memory store.
    let db = Arc::new(agora_db::Database::open(&PathBuf::from(&db_path))?);
    let sequences = Sequences::new(db.clone());
    let likes = LikeLedger::new(db.clone());

    let state: AppState = Arc::new(AppStateInner {
        boards: Boards::new(db.clone(), sequences.clone(), likes.clone()),
        feed: BoardFeed::new(db.clone()),
        profiles: Profiles::new(db.clone(), sequences),
        cleanup: Cleanup::new(db.clone(), likes),
        db,
        jwt_secret,
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/join", post(auth::join))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/status", get(auth::status))
        .route("/auth/password", put(auth::change_password))
        .route("/auth", delete(auth::withdraw))
        .route("/users", get(users::list_users))
        .route("/users/{nickname}", get(users::user_page))
        .route("/boards", get(boards::list_boards))
        .route("/boards", post(boards::create_board))
        .route("/boards/search", get(boards::search_boards))
        .route("/boards/{board_id}", get(boards::get_board))
        .route("/boards/{board_id}", put(boards::update_board))
        .route("/boards/{board_id}", delete(boards::delete_board))
        .route("/boards/{board_id}/likes", post(boards::toggle_like))
        .route("/boards/{board_id}/comments", post(comments::add_comment))
        .route(
            "/boards/{board_id}/comments/{comment_id}",
            put(comments::update_comment),
        )
        .route(
            "/boards/{board_id}/comments/{comment_id}",
            delete(comments::delete_comment),
        )
        .route("/mypage/projects", get(profile::list_projects))
        .route("/mypage/projects", post(profile::add_project))
        .route("/mypage/projects/{project_id}", put(profile::update_project))
        .route(
            "/mypage/projects/{project_id}",
            delete(profile::delete_project),
        )
        .route("/mypage/skills", get(profile::list_skills))
        .route("/mypage/skills", post(profile::add_skill))
        .route("/mypage/skills/{skill_id}", put(profile::update_skill))
        .route("/mypage/skills/{skill_id}", delete(profile::delete_skill))
        .layer(middleware::from_fn(require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Agora server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
