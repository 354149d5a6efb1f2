use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::models::car::{Car, CarStatus};
use crate::services::sortable_table::{ColumnDef, SortConfig};

// Valores del formulario de coche. Todos son texto, como en los inputs;
// los numéricos también aceptan números JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarFormInput {
    pub make: String,
    pub model: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
    pub color: String,
    pub license_plate: String,
    #[serde(deserialize_with = "string_or_number")]
    pub daily_rate: String,
    pub status: String,
    #[serde(deserialize_with = "string_or_number")]
    pub mileage: String,
    pub fuel_type: String,
    pub transmission: String,
}

impl CarFormInput {
    /// Estado inicial del formulario de alta
    pub fn initial() -> Self {
        Self {
            status: CarStatus::Available.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Prellenar el formulario de edición con un coche existente
    pub fn from_car(car: &Car) -> Self {
        Self {
            make: car.make.clone(),
            model: car.model.clone(),
            year: car.year.to_string(),
            color: car.color.clone(),
            license_plate: car.license_plate.clone(),
            daily_rate: car.daily_rate.normalize().to_string(),
            status: car.status.as_str().to_string(),
            mileage: car.mileage.map(|m| m.to_string()).unwrap_or_default(),
            fuel_type: car.fuel_type.map(|f| f.as_str().to_string()).unwrap_or_default(),
            transmission: car
                .transmission
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    /// Asignar un campo por su nombre en el formulario
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match field {
            "make" => &mut self.make,
            "model" => &mut self.model,
            "year" => &mut self.year,
            "color" => &mut self.color,
            "licensePlate" => &mut self.license_plate,
            "dailyRate" => &mut self.daily_rate,
            "status" => &mut self.status,
            "mileage" => &mut self.mileage,
            "fuelType" => &mut self.fuel_type,
            "transmission" => &mut self.transmission,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}

// Query params del listado de la flota
#[derive(Debug, Default, Deserialize)]
pub struct CarListQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
}

// Response del listado: definición de la tabla + filas ya ordenadas
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarTableResponse {
    pub columns: Vec<ColumnDef>,
    pub sortable_columns: Vec<String>,
    pub sort: SortConfig,
    pub cars: Vec<Car>,
}
