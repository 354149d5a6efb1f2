//! DTOs de la API
//!
//! Payloads de entrada y respuestas serializadas de los endpoints.

pub mod api_response;
pub mod auth_dto;
pub mod car_dto;
