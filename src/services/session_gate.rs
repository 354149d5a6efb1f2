//! Control de sesión del administrador
//!
//! La sesión es una cookie con `base64(contraseña ":" nonce)`. Es válida si
//! la contraseña extraída pertenece a la lista configurada de contraseñas de
//! administrador. No hay tabla de sesiones en servidor.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::environment::ConfigError;

pub const SESSION_COOKIE: &str = "admin_session";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

const TOKEN_DELIMITER: char = ':';

/// Configuración explícita del control de sesión
#[derive(Debug, Clone)]
pub struct AuthConfig {
    admin_passwords: Vec<String>,
    cookie_name: String,
    max_age_seconds: i64,
    secure_cookie: bool,
    protected_prefix: String,
    login_path: String,
    dashboard_path: String,
}

impl AuthConfig {
    /// Requiere al menos una contraseña no vacía
    pub fn new(admin_passwords: Vec<String>) -> Result<Self, ConfigError> {
        let admin_passwords: Vec<String> = admin_passwords
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if admin_passwords.is_empty() {
            return Err(ConfigError::Missing("ADMIN_PASSWORDS"));
        }

        Ok(Self {
            admin_passwords,
            cookie_name: SESSION_COOKIE.to_string(),
            max_age_seconds: 60 * 60 * 24 * 7,
            secure_cookie: false,
            protected_prefix: DASHBOARD_PATH.to_string(),
            login_path: LOGIN_PATH.to_string(),
            dashboard_path: DASHBOARD_PATH.to_string(),
        })
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age_seconds = seconds;
        self
    }

    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    pub fn secure_cookie(&self) -> bool {
        self.secure_cookie
    }
}

/// Decisión de la protección de rutas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectTo(String),
}

/// Errores de login
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Password is required")]
    MissingPassword,

    // No distingue usuario desconocido de contraseña incorrecta
    #[error("Invalid password")]
    InvalidPassword,
}

/// Control de sesión basado en una cookie
#[derive(Debug, Clone)]
pub struct SessionGate {
    config: AuthConfig,
}

impl SessionGate {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verificar si el valor de la cookie corresponde a una sesión válida
    pub fn is_authenticated(&self, cookie_value: Option<&str>) -> bool {
        let Some(value) = cookie_value.map(str::trim).filter(|v| !v.is_empty()) else {
            return false;
        };

        let Ok(bytes) = STANDARD.decode(value) else {
            return false;
        };
        let Ok(decoded) = String::from_utf8(bytes) else {
            return false;
        };

        match decoded.rsplit_once(TOKEN_DELIMITER) {
            Some((password, _nonce)) => self.is_admin_password(password),
            None => false,
        }
    }

    /// Decidir si una petición a `path` puede continuar
    pub fn require_auth(&self, path: &str, cookie_value: Option<&str>) -> GateDecision {
        if path.starts_with(&self.config.protected_prefix) {
            if !self.is_authenticated(cookie_value) {
                return GateDecision::RedirectTo(self.config.login_path.clone());
            }
            return GateDecision::Allow;
        }

        if path == self.config.login_path && self.is_authenticated(cookie_value) {
            return GateDecision::RedirectTo(self.config.dashboard_path.clone());
        }

        GateDecision::Allow
    }

    /// Comprobar la contraseña y emitir el valor de la cookie de sesión
    pub fn login(&self, password: &str) -> Result<String, AuthError> {
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }
        if !self.is_admin_password(password) {
            return Err(AuthError::InvalidPassword);
        }
        Ok(issue_token(password))
    }

    /// Cabecera Set-Cookie que establece la sesión
    pub fn session_cookie(&self, token: &str) -> String {
        self.build_cookie(token, self.config.max_age_seconds)
    }

    /// Cabecera Set-Cookie que borra la sesión
    pub fn clear_cookie(&self) -> String {
        self.build_cookie("", 0)
    }

    fn build_cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.config.cookie_name, value, max_age
        );
        if self.config.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn is_admin_password(&self, candidate: &str) -> bool {
        self.config
            .admin_passwords
            .iter()
            .any(|password| bool::from(password.as_bytes().ct_eq(candidate.as_bytes())))
    }
}

fn issue_token(password: &str) -> String {
    let mut nonce = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut nonce);
    STANDARD.encode(format!("{}{}{}", password, TOKEN_DELIMITER, hex::encode(nonce)))
}

/// Extraer el valor de una cookie de una cabecera `Cookie`
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
