//! Rutas HTTP
//!
//! Compone el router completo de la aplicación con el middleware de sesión
//! aplicado a todas las rutas.

pub mod auth_routes;
pub mod dashboard_routes;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::session::session_gate_middleware;
use crate::state::AppState;

/// Router de la aplicación sin la capa de CORS
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .merge(dashboard_routes::create_public_router())
        .layer(middleware::from_fn_with_state(state.clone(), session_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
