//! Modelo de Car
//!
//! Este módulo contiene el struct Car, sus enums y el payload tipado que
//! usan las operaciones de creación y actualización.
//! Mapea exactamente a la tabla `cars` de las migraciones.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::services::sortable_table::{SortValue, SortableRow};

/// Estado del coche - mapea al ENUM car_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "car_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
}

impl CarStatus {
    pub const ALL: [CarStatus; 3] = [CarStatus::Available, CarStatus::Rented, CarStatus::Maintenance];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Rented => "rented",
            CarStatus::Maintenance => "maintenance",
        }
    }
}

impl FromStr for CarStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de combustible - mapea al ENUM fuel_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "fuel_type")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const ALL: [FuelType; 4] = [FuelType::Gasoline, FuelType::Diesel, FuelType::Electric, FuelType::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "Gasoline",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }
}

impl FromStr for FuelType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelType::ALL.into_iter().find(|f| f.as_str() == s).ok_or(())
    }
}

/// Tipo de transmisión - mapea al ENUM transmission_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transmission_type")]
pub enum Transmission {
    Automatic,
    Manual,
}

impl Transmission {
    pub const ALL: [Transmission; 2] = [Transmission::Automatic, Transmission::Manual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
        }
    }
}

impl FromStr for Transmission {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transmission::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
    pub daily_rate: Decimal,
    pub status: CarStatus,
    pub mileage: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Valores tipados de un coche, ya validados, para create/update
#[derive(Debug, Clone, PartialEq)]
pub struct CarFields {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
    pub daily_rate: Decimal,
    pub status: CarStatus,
    pub mileage: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
}

impl SortableRow for Car {
    fn sort_value(&self, key: &str) -> SortValue {
        match key {
            "id" => SortValue::Text(self.id.to_string()),
            "make" => SortValue::Text(self.make.clone()),
            "model" => SortValue::Text(self.model.clone()),
            "year" => SortValue::Number(f64::from(self.year)),
            "color" => SortValue::Text(self.color.clone()),
            "licensePlate" => SortValue::Text(self.license_plate.clone()),
            "dailyRate" => self
                .daily_rate
                .to_f64()
                .map(SortValue::Number)
                .unwrap_or(SortValue::Missing),
            "status" => SortValue::Text(self.status.as_str().to_string()),
            "mileage" => self
                .mileage
                .map(|m| SortValue::Number(f64::from(m)))
                .unwrap_or(SortValue::Missing),
            "fuelType" => self
                .fuel_type
                .map(|f| SortValue::Text(f.as_str().to_string()))
                .unwrap_or(SortValue::Missing),
            "transmission" => self
                .transmission
                .map(|t| SortValue::Text(t.as_str().to_string()))
                .unwrap_or(SortValue::Missing),
            "createdAt" => SortValue::Number(self.created_at.timestamp_millis() as f64),
            "updatedAt" => SortValue::Number(self.updated_at.timestamp_millis() as f64),
            _ => SortValue::Missing,
        }
    }
}

/// Estadísticas del dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarStats {
    pub total: usize,
    pub available: usize,
    pub rented: usize,
    pub maintenance: usize,
    pub total_revenue_potential: Decimal,
}

impl CarStats {
    /// Agregar estadísticas a partir de pares (estado, tarifa diaria)
    pub fn from_rates<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (CarStatus, Decimal)>,
    {
        let mut stats = CarStats {
            total: 0,
            available: 0,
            rented: 0,
            maintenance: 0,
            total_revenue_potential: Decimal::ZERO,
        };

        for (status, daily_rate) in rows {
            stats.total += 1;
            match status {
                CarStatus::Available => stats.available += 1,
                CarStatus::Rented => stats.rented += 1,
                CarStatus::Maintenance => stats.maintenance += 1,
            }
            stats.total_revenue_potential += daily_rate;
        }

        stats.total_revenue_potential = stats.total_revenue_potential.round_dp(2);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_rates() {
        let stats = CarStats::from_rates(vec![
            (CarStatus::Available, Decimal::from(65)),
            (CarStatus::Rented, Decimal::from(55)),
            (CarStatus::Available, Decimal::from(120)),
            (CarStatus::Maintenance, Decimal::new(9550, 2)),
        ]);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.available, 2);
        assert_eq!(stats.rented, 1);
        assert_eq!(stats.maintenance, 1);
        assert_eq!(stats.total_revenue_potential.to_string(), "335.50");
    }

    #[test]
    fn test_stats_empty_fleet() {
        let stats = CarStats::from_rates(Vec::new());
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_revenue_potential, Decimal::ZERO);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("rented".parse::<CarStatus>(), Ok(CarStatus::Rented));
        assert!("Rented".parse::<CarStatus>().is_err());
        assert_eq!(CarStatus::default(), CarStatus::Available);
    }
}
