//! Middleware de sesión
//!
//! Aplica `SessionGate::require_auth` a cada petición antes de llegar al
//! handler. Las rutas bajo `/dashboard` sin sesión válida redirigen a
//! `/login`; `/login` con sesión redirige al dashboard.

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::services::session_gate::{find_cookie, GateDecision};
use crate::state::AppState;

pub async fn session_gate_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let gate = &state.session_gate;
    let path = request.uri().path().to_string();

    let cookie = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| find_cookie(header, gate.config().cookie_name()))
        .map(str::to_string);

    match gate.require_auth(&path, cookie.as_deref()) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectTo(target) => {
            tracing::debug!("🔒 {} -> {}", path, target);
            Redirect::temporary(&target).into_response()
        }
    }
}
