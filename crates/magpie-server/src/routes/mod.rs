// Export route modules
pub mod agents;
pub mod chat;
pub mod envelope;
pub mod health;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::request_logging;
use crate::state::AppState;

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::routes(state.clone()))
        .merge(chat::routes(state.clone()))
        .merge(agents::routes(state))
        .layer(from_fn(request_logging))
        .layer(cors)
}
