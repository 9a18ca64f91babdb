use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // --- Auth routes (no auth required) ---
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // --- Player routes (profile endpoints require auth, lookups are public) ---
    let player_routes = Router::new()
        .route(
            "/",
            get(routes::players::list_players)
                .post(routes::players::create_player)
                .layer(axum_mw::from_fn_with_state(
                    state.clone(),
                    middleware::auth::authenticate,
                )),
        )
        .route(
            "/check",
            get(routes::players::check_profile).layer(axum_mw::from_fn_with_state(
                state.clone(),
                middleware::auth::authenticate,
            )),
        )
        .route("/:playerId", get(routes::players::get_player))
        .route("/:playerId/stats", get(routes::players::get_player_stats));

    // --- Match routes (submission and verification require auth) ---
    let match_routes = Router::new()
        .route(
            "/",
            post(routes::matches::create_match)
                .layer(axum_mw::from_fn_with_state(
                    state.clone(),
                    middleware::auth::authenticate,
                ))
                .get(routes::matches::list_matches),
        )
        .route("/player/:playerId", get(routes::matches::player_matches))
        .route(
            "/verify",
            post(routes::matches::verify_match).layer(axum_mw::from_fn_with_state(
                state.clone(),
                middleware::auth::authenticate,
            )),
        );

    let rank_routes = Router::new().route("/", get(routes::ranks::get_rankings));

    let location_routes = Router::new().route(
        "/",
        post(routes::locations::create_location)
            .layer(axum_mw::from_fn_with_state(
                state.clone(),
                middleware::auth::authenticate,
            ))
            .get(routes::locations::list_locations),
    );

    // --- Compose full API ---
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/players", player_routes)
        .nest("/matches", match_routes)
        .nest("/ranks", rank_routes)
        .nest("/locations", location_routes);

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(routes::health::health))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .json()
        .init();

    let pool = db::create_pool(&config).await;

    let state = AppState {
        db: pool,
        config: Arc::new(config),
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.port));
    tracing::info!("PickleJar API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    let router = build_router(state);
    axum::serve(listener, router).await.expect("Server error");
}
