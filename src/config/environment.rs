//! Configuración de variables de entorno
//!
//! Este módulo lee la configuración del proceso una sola vez al arrancar.
//! Si falta algo obligatorio (la URL de la base de datos o la contraseña de
//! administrador) el servidor no arranca.

use std::env;

use thiserror::Error;

use crate::services::session_gate::AuthConfig;
use crate::utils::validation::FormVariant;

const DEFAULT_SESSION_MAX_AGE: i64 = 60 * 60 * 24 * 7;

/// Errores de configuración
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub admin_passwords: Vec<String>,
    pub session_max_age: i64,
    pub cors_origins: Vec<String>,
    pub require_extended_fields: bool,
    pub log_level: String,
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Leer la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 3000,
        };

        let session_max_age = match var("SESSION_MAX_AGE_SECONDS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SESSION_MAX_AGE_SECONDS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_SESSION_MAX_AGE,
        };

        let require_extended_fields = match var("REQUIRE_EXTENDED_FIELDS") {
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REQUIRE_EXTENDED_FIELDS",
                        value: raw,
                    })
                }
            },
            None => false,
        };

        // ADMIN_PASSWORDS tiene prioridad; ADMIN_PASSWORD queda como alternativa
        let admin_passwords = split_list(
            &var("ADMIN_PASSWORDS")
                .or_else(|| var("ADMIN_PASSWORD"))
                .ok_or(ConfigError::Missing("ADMIN_PASSWORDS"))?,
        );
        if admin_passwords.is_empty() {
            return Err(ConfigError::Missing("ADMIN_PASSWORDS"));
        }

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            admin_passwords,
            session_max_age,
            cors_origins: var("CORS_ORIGINS").map(|v| split_list(&v)).unwrap_or_default(),
            require_extended_fields,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Variante de validación de los formularios de coches
    pub fn form_variant(&self) -> FormVariant {
        if self.require_extended_fields {
            FormVariant::Extended
        } else {
            FormVariant::Standard
        }
    }

    /// Configuración explícita para el control de sesión
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        Ok(AuthConfig::new(self.admin_passwords.clone())?
            .with_max_age(self.session_max_age)
            .with_secure_cookie(self.is_production()))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
