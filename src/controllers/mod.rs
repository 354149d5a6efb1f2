//! Controladores
//!
//! Orquestan servicios y repositorios para cada endpoint.

pub mod car_form_controller;
pub mod fleet_controller;
