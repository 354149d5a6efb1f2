//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema y su conversión a
//! respuestas HTTP. Los errores de acceso a datos nunca llegan tal cual al
//! usuario: cada categoría de operación tiene un mensaje fijo.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::utils::validation::FieldErrors;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Categoría de operación sobre la flota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarOperation {
    Fetch,
    Create,
    Update,
    Delete,
    Stats,
}

impl CarOperation {
    /// Mensaje visible para el usuario
    pub fn user_message(&self) -> &'static str {
        match self {
            CarOperation::Fetch => "Failed to load cars. Please refresh the page.",
            CarOperation::Create => "Failed to add car. Please try again.",
            CarOperation::Update => "Failed to update car. Please try again.",
            CarOperation::Delete => "Failed to delete car. Please try again.",
            CarOperation::Stats => "Failed to load statistics. Please refresh the page.",
        }
    }
}

impl fmt::Display for CarOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CarOperation::Fetch => "fetch",
            CarOperation::Create => "create",
            CarOperation::Update => "update",
            CarOperation::Delete => "delete",
            CarOperation::Stats => "stats",
        };
        f.write_str(name)
    }
}

/// Error de acceso a datos; conserva el error original para diagnóstico
#[derive(Debug, Error)]
#[error("car store {operation} failed: {source}")]
pub struct CarServiceError {
    pub operation: CarOperation,
    #[source]
    pub source: BoxError,
}

impl CarServiceError {
    pub fn new(operation: CarOperation, source: impl Into<BoxError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.operation.user_message()
    }
}

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0:?}")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    CarService(#[from] CarServiceError),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            error: error.into(),
            code,
            fields: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(fields) => {
                tracing::debug!("Validation error on fields: {:?}", fields.fields().collect::<Vec<_>>());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse {
                        error: "The provided data is invalid".to_string(),
                        code: "VALIDATION_ERROR",
                        fields: Some(fields),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg, "BAD_REQUEST"))
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg, "UNAUTHORIZED"))
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorResponse::new(msg, "NOT_FOUND"))
            }

            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new(msg, "CONFLICT"))
            }

            AppError::CarService(e) => {
                tracing::error!("Car store error ({}): {}", e.operation, e.source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(e.user_message(), "CAR_SERVICE_ERROR"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
