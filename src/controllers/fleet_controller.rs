use std::sync::Arc;

use uuid::Uuid;

use crate::dto::car_dto::{CarListQuery, CarTableResponse};
use crate::models::car::{Car, CarStats};
use crate::repositories::car_repository::CarStore;
use crate::services::sortable_table::{SortConfig, SortDirection, SortableTable};
use crate::utils::errors::{not_found_error, AppError};

pub struct FleetController {
    store: Arc<dyn CarStore>,
}

impl FleetController {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }

    /// Tabla de la flota ordenada según los query params
    pub async fn list(&self, query: CarListQuery) -> Result<CarTableResponse, AppError> {
        let mut table = SortableTable::fleet();
        table
            .apply(sort_config_from_query(&query)?)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let cars = self.store.list().await?;
        let sorted: Vec<Car> = table.compute_view(&cars).into_iter().cloned().collect();

        Ok(CarTableResponse {
            columns: table.columns().to_vec(),
            sortable_columns: table.sortable_columns().to_vec(),
            sort: table.sort_config().clone(),
            cars: sorted,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Car, AppError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| not_found_error("Car", &id.to_string()))
    }

    pub async fn stats(&self) -> Result<CarStats, AppError> {
        Ok(self.store.stats().await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(not_found_error("Car", &id.to_string()));
        }
        tracing::info!("🗑️ Coche {} eliminado", id);
        Ok(())
    }
}

fn sort_config_from_query(query: &CarListQuery) -> Result<SortConfig, AppError> {
    let direction = match query.direction.as_deref() {
        Some(raw) => raw
            .parse::<SortDirection>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?,
        // Sin dirección explícita, una columna pedida se ordena descendente
        None if query.sort.is_some() => SortDirection::Descending,
        None => SortDirection::None,
    };

    Ok(match query.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(column) => SortConfig::by(column, direction),
        None => SortConfig::none(),
    })
}
