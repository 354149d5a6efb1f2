//! Fleet Admin
//!
//! Backend del panel de administración de la flota de alquiler: validación
//! de formularios de coches, tabla ordenable, controlador del formulario y
//! control de sesión del administrador.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
