//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::repositories::car_repository::CarStore;
use crate::services::session_gate::SessionGate;
use crate::utils::validation::FormVariant;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CarStore>,
    pub session_gate: Arc<SessionGate>,
    pub form_variant: FormVariant,
}

impl AppState {
    pub fn new(store: Arc<dyn CarStore>, session_gate: SessionGate, form_variant: FormVariant) -> Self {
        Self {
            store,
            session_gate: Arc::new(session_gate),
            form_variant,
        }
    }
}
