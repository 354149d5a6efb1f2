//! Repositorios
//!
//! Acceso a datos de la flota detrás del trait `CarStore`.

pub mod car_repository;

pub use car_repository::{CarRepository, CarStore};
