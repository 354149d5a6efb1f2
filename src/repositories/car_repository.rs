use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::{Car, CarFields, CarStats, CarStatus};
use crate::utils::errors::{CarOperation, CarServiceError};

/// Acceso a datos de la flota
#[async_trait]
pub trait CarStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Car>, CarServiceError>;

    async fn get(&self, id: Uuid) -> Result<Option<Car>, CarServiceError>;

    async fn create(&self, fields: CarFields) -> Result<Car, CarServiceError>;

    async fn update(&self, id: Uuid, fields: CarFields) -> Result<Car, CarServiceError>;

    /// Devuelve `false` si no existía ningún coche con ese id
    async fn delete(&self, id: Uuid) -> Result<bool, CarServiceError>;

    async fn stats(&self) -> Result<CarStats, CarServiceError>;
}

fn store_error(operation: CarOperation, error: sqlx::Error) -> CarServiceError {
    log::error!("❌ Error {} car: {}", operation, error);
    CarServiceError::new(operation, error)
}

/// Adaptador PostgreSQL de `CarStore`
#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for CarRepository {
    async fn list(&self) -> Result<Vec<Car>, CarServiceError> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(CarOperation::Fetch, e))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Car>, CarServiceError> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error(CarOperation::Fetch, e))
    }

    async fn create(&self, fields: CarFields) -> Result<Car, CarServiceError> {
        let now = Utc::now();

        sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, make, model, year, color, license_plate, daily_rate, status,
                              mileage, fuel_type, transmission, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(fields.make)
        .bind(fields.model)
        .bind(fields.year)
        .bind(fields.color)
        .bind(fields.license_plate)
        .bind(fields.daily_rate)
        .bind(fields.status)
        .bind(fields.mileage)
        .bind(fields.fuel_type)
        .bind(fields.transmission)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(CarOperation::Create, e))
    }

    async fn update(&self, id: Uuid, fields: CarFields) -> Result<Car, CarServiceError> {
        sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET make = $2, model = $3, year = $4, color = $5, license_plate = $6,
                daily_rate = $7, status = $8, mileage = $9, fuel_type = $10,
                transmission = $11, updated_at = $12
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.make)
        .bind(fields.model)
        .bind(fields.year)
        .bind(fields.color)
        .bind(fields.license_plate)
        .bind(fields.daily_rate)
        .bind(fields.status)
        .bind(fields.mileage)
        .bind(fields.fuel_type)
        .bind(fields.transmission)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(CarOperation::Update, e))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, CarServiceError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error(CarOperation::Delete, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> Result<CarStats, CarServiceError> {
        let rows = sqlx::query_as::<_, (CarStatus, Decimal)>("SELECT status, daily_rate FROM cars")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(CarOperation::Stats, e))?;

        Ok(CarStats::from_rates(rows))
    }
}
