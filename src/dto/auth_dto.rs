use serde::{Deserialize, Serialize};
use validator::Validate;

// Login request: una única contraseña compartida de administrador
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub password: Option<String>,
}

// Login/logout response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
