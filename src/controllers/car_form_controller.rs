//! Controlador del formulario de coches
//!
//! Mantiene los valores del formulario, los errores por campo y los flags de
//! envío. Como mucho hay un envío en curso por instancia: un segundo
//! `submit()` mientras el primero espera al almacén se descarta.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::dto::car_dto::CarFormInput;
use crate::models::car::Car;
use crate::repositories::car_repository::CarStore;
use crate::utils::errors::CarServiceError;
use crate::utils::validation::{current_year, parse_car_form, FieldErrors, FormVariant};

/// Clave del mapa de errores para fallos del envío
pub const SUBMIT_ERROR_FIELD: &str = "submit";

/// Alta o edición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

/// Resultado de un envío
#[derive(Debug)]
pub enum SubmitOutcome {
    Saved(Car),
    Invalid(FieldErrors),
    Failed(CarServiceError),
    AlreadySubmitting,
}

#[derive(Debug)]
struct FormState {
    values: CarFormInput,
    initial: CarFormInput,
    errors: FieldErrors,
    success: bool,
}

/// Libera el flag de envío aunque el future se cancele
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct CarFormController<S: CarStore + ?Sized> {
    store: Arc<S>,
    mode: FormMode,
    variant: FormVariant,
    state: Mutex<FormState>,
    in_flight: AtomicBool,
}

impl<S: CarStore + ?Sized> CarFormController<S> {
    /// Formulario de alta con el estado inicial
    pub fn new(store: Arc<S>, variant: FormVariant) -> Self {
        Self::with_mode(store, variant, FormMode::Create, CarFormInput::initial())
    }

    /// Formulario de edición prellenado con el coche existente
    pub fn for_edit(store: Arc<S>, variant: FormVariant, car: &Car) -> Self {
        Self::with_mode(store, variant, FormMode::Edit(car.id), CarFormInput::from_car(car))
    }

    fn with_mode(store: Arc<S>, variant: FormVariant, mode: FormMode, initial: CarFormInput) -> Self {
        Self {
            store,
            mode,
            variant,
            state: Mutex::new(FormState {
                values: initial.clone(),
                initial,
                errors: FieldErrors::new(),
                success: false,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Sustituir todos los valores (p. ej. con el cuerpo de una petición)
    pub fn with_values(self, values: CarFormInput) -> Self {
        Self {
            state: Mutex::new(FormState {
                values,
                ..self.state.into_inner()
            }),
            ..self
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub async fn values(&self) -> CarFormInput {
        self.state.lock().await.values.clone()
    }

    pub async fn errors(&self) -> FieldErrors {
        self.state.lock().await.errors.clone()
    }

    pub async fn is_success(&self) -> bool {
        self.state.lock().await.success
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Cambiar un campo; borra el error que tuviera ese campo
    pub async fn set_field(&self, field: &str, value: impl Into<String>) -> bool {
        let mut state = self.state.lock().await;
        if !state.values.set(field, value) {
            return false;
        }
        state.errors.remove(field);
        true
    }

    /// Volver al estado inicial del formulario
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.values = state.initial.clone();
        state.errors = FieldErrors::new();
        state.success = false;
    }

    /// Validar y, si todo es correcto, crear o actualizar el coche
    pub async fn submit(&self) -> SubmitOutcome {
        if self.is_submitting() {
            warn!("⚠️ Envío descartado: ya hay uno en curso");
            return SubmitOutcome::AlreadySubmitting;
        }

        let values = self.state.lock().await.values.clone();
        let fields = match parse_car_form(&values, self.variant, current_year()) {
            Ok(fields) => fields,
            Err(errors) => {
                self.state.lock().await.errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("⚠️ Envío descartado: ya hay uno en curso");
            return SubmitOutcome::AlreadySubmitting;
        }
        let _guard = InFlightGuard(&self.in_flight);

        {
            let mut state = self.state.lock().await;
            state.errors = FieldErrors::new();
            state.success = false;
        }

        let result = match self.mode {
            FormMode::Create => self.store.create(fields).await,
            FormMode::Edit(id) => self.store.update(id, fields).await,
        };

        let mut state = self.state.lock().await;
        match result {
            Ok(car) => {
                info!("✅ Coche {} guardado ({:?})", car.id, self.mode);
                state.success = true;
                SubmitOutcome::Saved(car)
            }
            Err(e) => {
                error!("❌ Error guardando coche ({:?}): {}", self.mode, e);
                state.errors.insert(SUBMIT_ERROR_FIELD, e.user_message());
                SubmitOutcome::Failed(e)
            }
        }
    }
}
