//! Services module
//!
//! Este módulo contiene la lógica de negocio sin dependencias de HTTP ni de
//! base de datos: el motor de tabla ordenable y el control de sesión.

pub mod session_gate;
pub mod sortable_table;

pub use session_gate::*;
pub use sortable_table::*;
