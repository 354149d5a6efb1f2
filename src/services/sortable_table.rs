//! Motor de tabla ordenable
//!
//! Mantiene el estado de ordenación de una tabla (columna + dirección) y
//! produce vistas ordenadas de las filas sin modificar la colección original.
//! Ciclo por columna: ninguna -> descendente -> ascendente -> ninguna.

use std::cmp::Ordering;
use std::str::FromStr;

use feruca::Collator;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dirección de ordenación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Descending,
    Ascending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::None => "none",
            SortDirection::Descending => "descending",
            SortDirection::Ascending => "ascending",
        }
    }
}

impl FromStr for SortDirection {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(SortDirection::None),
            "desc" | "descending" => Ok(SortDirection::Descending),
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            other => Err(SortError::InvalidDirection(other.to_string())),
        }
    }
}

/// Errores del motor de ordenación
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    #[error("Column '{0}' is not sortable")]
    NotSortable(String),

    #[error("Invalid sort direction '{0}'")]
    InvalidDirection(String),
}

/// Estado de ordenación de una tabla
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        if direction == SortDirection::None {
            return Self::none();
        }
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    /// Solo hay orden efectivo con columna y dirección a la vez
    pub fn is_active(&self) -> bool {
        self.column.is_some() && self.direction != SortDirection::None
    }
}

/// Valor de una celda usado como clave de ordenación
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Text(String),
    Missing,
}

impl SortValue {
    fn as_text(&self) -> String {
        match self {
            SortValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            SortValue::Number(n) => n.to_string(),
            SortValue::Text(s) => s.clone(),
            SortValue::Missing => String::new(),
        }
    }
}

/// Fila que expone sus celdas por clave de columna
pub trait SortableRow {
    fn sort_value(&self, key: &str) -> SortValue;
}

impl SortableRow for serde_json::Value {
    fn sort_value(&self, key: &str) -> SortValue {
        match self.get(key) {
            Some(serde_json::Value::Number(n)) => n
                .as_f64()
                .map(SortValue::Number)
                .unwrap_or(SortValue::Missing),
            Some(serde_json::Value::String(s)) => SortValue::Text(s.clone()),
            Some(serde_json::Value::Null) | None => SortValue::Missing,
            Some(other) => SortValue::Text(other.to_string()),
        }
    }
}

/// Comparación numérica si ambos valores son números; en cualquier otro
/// caso, colación Unicode sin distinguir mayúsculas ("Škoda" antes de "Toyota").
pub fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    compare_with(&mut Collator::default(), a, b)
}

fn compare_with(collator: &mut Collator, a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        _ => {
            let a = a.as_text().to_lowercase();
            let b = b.as_text().to_lowercase();
            collator.collate(a.as_str(), b.as_str())
        }
    }
}

/// Ordenar una vista de las filas según la configuración dada.
///
/// El orden es estable: filas con la misma clave conservan su posición
/// relativa en ambas direcciones.
pub fn sort_rows<'a, R: SortableRow>(rows: &'a [R], config: &SortConfig) -> Vec<&'a R> {
    let column = match (&config.column, config.direction) {
        (Some(column), direction) if direction != SortDirection::None => column,
        _ => return rows.iter().collect(),
    };

    let mut keyed: Vec<(SortValue, &R)> = rows
        .iter()
        .map(|row| (row.sort_value(column), row))
        .collect();

    let mut collator = Collator::default();
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_with(&mut collator, a, b);
        match config.direction {
            SortDirection::Descending => ordering.reverse(),
            _ => ordering,
        }
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Definición de una columna mostrada
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub key: String,
    pub header: String,
}

impl ColumnDef {
    pub fn new(key: &str, header: &str) -> Self {
        Self {
            key: key.to_string(),
            header: header.to_string(),
        }
    }
}

/// Tabla ordenable con su estado de ordenación
#[derive(Debug, Clone)]
pub struct SortableTable {
    columns: Vec<ColumnDef>,
    sortable_columns: Vec<String>,
    sort_config: SortConfig,
}

impl SortableTable {
    pub fn new<I, S>(columns: Vec<ColumnDef>, sortable_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns,
            sortable_columns: sortable_columns.into_iter().map(Into::into).collect(),
            sort_config: SortConfig::none(),
        }
    }

    /// Tabla de la flota tal como la muestra el dashboard
    pub fn fleet() -> Self {
        Self::new(
            vec![
                ColumnDef::new("make", "Make"),
                ColumnDef::new("year", "Year"),
                ColumnDef::new("color", "Color"),
                ColumnDef::new("licensePlate", "License Plate"),
                ColumnDef::new("dailyRate", "Daily Rate"),
                ColumnDef::new("status", "Status"),
                ColumnDef::new("actions", "Actions"),
            ],
            ["year", "dailyRate"],
        )
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn sortable_columns(&self) -> &[String] {
        &self.sortable_columns
    }

    pub fn sort_config(&self) -> &SortConfig {
        &self.sort_config
    }

    pub fn is_sortable(&self, key: &str) -> bool {
        self.sortable_columns.iter().any(|c| c == key)
    }

    /// Alternar la ordenación de una columna.
    ///
    /// Una columna nueva empieza en descendente; después ascendente; el
    /// tercer clic quita la ordenación.
    pub fn toggle_sort(&mut self, key: &str) -> Result<&SortConfig, SortError> {
        if !self.is_sortable(key) {
            return Err(SortError::NotSortable(key.to_string()));
        }

        let same_column = self.sort_config.column.as_deref() == Some(key);
        self.sort_config = match (same_column, self.sort_config.direction) {
            (false, _) => SortConfig::by(key, SortDirection::Descending),
            (true, SortDirection::Descending) => SortConfig::by(key, SortDirection::Ascending),
            (true, SortDirection::Ascending) => SortConfig::none(),
            (true, SortDirection::None) => SortConfig::by(key, SortDirection::Descending),
        };

        Ok(&self.sort_config)
    }

    /// Fijar directamente una configuración (p. ej. desde query params)
    pub fn apply(&mut self, config: SortConfig) -> Result<&SortConfig, SortError> {
        if let Some(column) = &config.column {
            if !self.is_sortable(column) {
                return Err(SortError::NotSortable(column.clone()));
            }
        }
        self.sort_config = if config.is_active() { config } else { SortConfig::none() };
        Ok(&self.sort_config)
    }

    /// Dirección que indica la flecha de la cabecera de una columna
    pub fn sort_indicator(&self, key: &str) -> SortDirection {
        if self.sort_config.column.as_deref() == Some(key) {
            self.sort_config.direction
        } else {
            SortDirection::None
        }
    }

    pub fn compute_view<'a, R: SortableRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        sort_rows(rows, &self.sort_config)
    }
}
