//! Utilidades de validación
//!
//! Reglas de validación del formulario de coches. Cada regla es una función
//! pura que devuelve el valor ya convertido o un `ValidationError` con el
//! mensaje que se muestra junto al campo.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::dto::car_dto::CarFormInput;
use crate::models::car::{CarFields, CarStatus, FuelType, Transmission};

pub const MIN_YEAR: i32 = 1990;
pub const MIN_MAKE_LENGTH: usize = 2;
pub const MIN_LICENSE_PLATE_LENGTH: usize = 4;
pub const MAX_DAILY_RATE_SCALE: u32 = 2;

/// Variante del formulario de coches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormVariant {
    /// Campos persistidos del coche
    #[default]
    Standard,
    /// Además exige combustible y transmisión
    Extended,
}

/// Mapa campo -> mensaje de error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Registrar el resultado de una regla y devolver el valor si pasó
    fn check<T>(&mut self, field: &str, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                let message = error
                    .message
                    .map(Cow::into_owned)
                    .unwrap_or_else(|| format!("{} is invalid", field));
                self.insert(field, message);
                None
            }
        }
    }
}

fn rule_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Owned(message.into()));
    error
}

/// Validar que un string no esté vacío (tras trim)
pub fn validate_required<'a>(value: &'a str, message: &str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(rule_error("required", message));
    }
    Ok(trimmed)
}

/// Validar longitud mínima en caracteres
pub fn validate_min_length(value: &str, min: usize, message: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        let mut error = rule_error("length", message);
        error.add_param("min".into(), &min);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango cerrado
pub fn validate_range<T: PartialOrd + Serialize>(
    value: T,
    min: T,
    max: T,
    message: &str,
) -> Result<T, ValidationError> {
    if value < min || value > max {
        let mut error = rule_error("range", message);
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(value)
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + num_traits::Zero + Serialize>(
    value: T,
    message: &str,
) -> Result<T, ValidationError> {
    if value <= T::zero() {
        let mut error = rule_error("positive", message);
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(value)
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + num_traits::Zero + Serialize>(
    value: T,
    message: &str,
) -> Result<T, ValidationError> {
    if value < T::zero() {
        let mut error = rule_error("non_negative", message);
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(value)
}

/// Validar que un valor pertenezca a un conjunto cerrado
pub fn validate_enum<T: FromStr>(value: &str, allowed: &[&str], label: &str) -> Result<T, ValidationError> {
    value.parse::<T>().map_err(|_| {
        let mut error = rule_error(
            "enum",
            format!("{} must be one of {}", label, allowed.join(", ")),
        );
        error.add_param("value".into(), &value);
        error
    })
}

fn check_make(value: &str) -> Result<String, ValidationError> {
    let make = validate_required(value, "Make is required")?;
    validate_min_length(make, MIN_MAKE_LENGTH, "Make must be at least 2 characters")?;
    Ok(make.to_string())
}

fn check_year(value: &str, current_year: i32) -> Result<i32, ValidationError> {
    let raw = validate_required(value, "Year is required")?;
    let max_year = current_year + 1;
    let message = format!("Year must be between {} and {}", MIN_YEAR, max_year);
    let year = raw.parse::<i32>().map_err(|_| rule_error("integer", message.clone()))?;
    validate_range(year, MIN_YEAR, max_year, &message)
}

fn check_license_plate(value: &str) -> Result<String, ValidationError> {
    let plate = validate_required(value, "License plate is required")?;
    validate_min_length(
        plate,
        MIN_LICENSE_PLATE_LENGTH,
        "License plate must be at least 4 characters",
    )?;
    Ok(plate.to_string())
}

fn check_daily_rate(value: &str) -> Result<Decimal, ValidationError> {
    let raw = validate_required(value, "Daily rate is required")?;
    let message = "Daily rate must be a positive number";
    let rate = Decimal::from_str(raw).map_err(|_| rule_error("decimal", message))?;
    let rate = validate_positive(rate, message)?;

    // La columna es NUMERIC(10, 2)
    if rate.normalize().scale() > MAX_DAILY_RATE_SCALE {
        let mut error = rule_error("scale", "Daily rate must have at most 2 decimal places");
        error.add_param("max".into(), &MAX_DAILY_RATE_SCALE);
        return Err(error);
    }
    validate_range(rate, Decimal::ZERO, max_daily_rate(), "Daily rate must be at most 99999999.99")
}

fn max_daily_rate() -> Decimal {
    Decimal::new(9_999_999_999, MAX_DAILY_RATE_SCALE)
}

fn check_status(value: &str) -> Result<CarStatus, ValidationError> {
    let raw = value.trim();
    if raw.is_empty() {
        return Ok(CarStatus::default());
    }
    let allowed: Vec<&str> = CarStatus::ALL.iter().map(CarStatus::as_str).collect();
    validate_enum(raw, &allowed, "Status")
}

fn check_mileage(value: &str) -> Result<Option<i32>, ValidationError> {
    let raw = value.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let message = "Mileage must be a non-negative number";
    let mileage = raw.parse::<i32>().map_err(|_| rule_error("integer", message))?;
    validate_non_negative(mileage, message).map(Some)
}

fn check_selection<T: FromStr>(
    value: &str,
    allowed: &[&str],
    label: &str,
    required: bool,
) -> Result<Option<T>, ValidationError> {
    let raw = value.trim();
    if raw.is_empty() {
        if required {
            return Err(rule_error("required", format!("{} is required", label)));
        }
        return Ok(None);
    }
    validate_enum(raw, allowed, label).map(Some)
}

/// Validar y convertir el formulario a valores tipados.
///
/// Devuelve todos los errores encontrados, no solo el primero.
pub fn parse_car_form(
    form: &CarFormInput,
    variant: FormVariant,
    current_year: i32,
) -> Result<CarFields, FieldErrors> {
    let mut errors = FieldErrors::new();
    let extended = variant == FormVariant::Extended;

    let fuel_types: Vec<&str> = FuelType::ALL.iter().map(FuelType::as_str).collect();
    let transmissions: Vec<&str> = Transmission::ALL.iter().map(Transmission::as_str).collect();

    let make = errors.check("make", check_make(&form.make));
    let model = errors.check("model", validate_required(&form.model, "Model is required"));
    let year = errors.check("year", check_year(&form.year, current_year));
    let color = errors.check("color", validate_required(&form.color, "Color is required"));
    let license_plate = errors.check("licensePlate", check_license_plate(&form.license_plate));
    let daily_rate = errors.check("dailyRate", check_daily_rate(&form.daily_rate));
    let status = errors.check("status", check_status(&form.status));
    let mileage = errors.check("mileage", check_mileage(&form.mileage));
    let fuel_type = errors.check(
        "fuelType",
        check_selection::<FuelType>(&form.fuel_type, &fuel_types, "Fuel type", extended),
    );
    let transmission = errors.check(
        "transmission",
        check_selection::<Transmission>(&form.transmission, &transmissions, "Transmission", extended),
    );

    match (make, model, year, color, license_plate, daily_rate, status, mileage, fuel_type, transmission) {
        (
            Some(make),
            Some(model),
            Some(year),
            Some(color),
            Some(license_plate),
            Some(daily_rate),
            Some(status),
            Some(mileage),
            Some(fuel_type),
            Some(transmission),
        ) if errors.is_empty() => Ok(CarFields {
            make,
            model: model.to_string(),
            year,
            color: color.to_string(),
            license_plate,
            daily_rate,
            status,
            mileage,
            fuel_type,
            transmission,
        }),
        _ => Err(errors),
    }
}

/// Reglas de validación con un año de referencia explícito
pub fn validate_car_form(form: &CarFormInput, variant: FormVariant, current_year: i32) -> FieldErrors {
    parse_car_form(form, variant, current_year)
        .err()
        .unwrap_or_default()
}

/// Reglas de validación con el año actual
pub fn validate_car(form: &CarFormInput, variant: FormVariant) -> FieldErrors {
    validate_car_form(form, variant, current_year())
}

pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}
