use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod api;
mod db;
mod errors;
mod middleware;
mod models;
mod services;
mod utils;
#[cfg(test)]
mod tests;

use db::MemoryStore;
use services::auth_service::AuthService;
use services::authorizer::TokenAuthorizer;
use services::jwt_service::JwtService;
use utils::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub auth_service: AuthService,
    pub authorizer: TokenAuthorizer,
}

impl AppState {
    pub fn new(config: Config, store: MemoryStore) -> Self {
        let jwt_service = JwtService::new(&config);
        let auth_service = AuthService::new(store.clone(), jwt_service.clone(), config.bcrypt_cost);
        let authorizer = TokenAuthorizer::new(jwt_service);

        Self {
            store,
            auth_service,
            authorizer,
        }
    }
}

#[derive(Serialize)]
struct Message {
    message: String,
}

async fn hello_world() -> Json<Message> {
    Json(Message {
        message: "Hello, World!".to_string(),
    })
}

pub fn create_router(state: AppState) -> Router {
    // Create a CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // routes that only need a valid, consistent token pair
    let protected = Router::new()
        .route("/me", get(api::user::get_current_user))
        .route("/groups", post(api::group::create_group))
        .route_layer(from_fn_with_state(state.clone(), middleware::auth::require_login));

    let api_routes = Router::new()
        .route("/register", post(api::auth::register))
        .route("/admin", post(api::auth::register_admin))
        .route("/login", post(api::auth::login))
        .route("/logout", get(api::auth::logout))
        .route("/users", get(api::user::list_users))
        .route("/users/:username", get(api::user::get_user))
        .route("/groups/:name", get(api::group::get_group))
        .merge(protected);

    Router::new()
        .route("/", get(hello_world))
        .nest("/api", api_routes)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr;

    let app = create_router(AppState::new(config, MemoryStore::new()));

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
