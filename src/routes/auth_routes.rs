use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, LoginRequest};
use crate::services::session_gate::AuthError;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    // Cuerpo ilegible o sin contraseña: mismo error JSON
    let request = match body {
        Ok(Json(request)) if request.validate().is_ok() => request,
        Ok(_) => return Err(AppError::BadRequest(AuthError::MissingPassword.to_string())),
        Err(rejection) => {
            tracing::debug!("Login body rejected: {}", rejection.body_text());
            return Err(AppError::BadRequest(AuthError::MissingPassword.to_string()));
        }
    };
    let password = request.password.unwrap_or_default();

    let token = state.session_gate.login(&password).map_err(|e| match e {
        AuthError::MissingPassword => AppError::BadRequest(e.to_string()),
        AuthError::InvalidPassword => AppError::Unauthorized(e.to_string()),
    })?;

    tracing::info!("🔐 Sesión de administrador iniciada");
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, state.session_gate.session_cookie(&token))],
        Json(AuthResponse::ok()),
    ))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("👋 Sesión de administrador cerrada");
    (
        [(SET_COOKIE, state.session_gate.clear_cookie())],
        Json(AuthResponse::ok()),
    )
}
