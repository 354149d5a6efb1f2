//! Middleware del sistema
//!
//! Este módulo contiene el middleware de sesión y la configuración de CORS.

pub mod cors;
pub mod session;

pub use cors::*;
pub use session::*;
