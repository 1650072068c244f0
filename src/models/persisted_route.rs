//! Proyección de almacenamiento de una plantilla de ruta
//!
//! Mapea la tabla `get_route_with_step`. `route_id` es la clave de negocio
//! única sobre la que opera el upsert; `id` es una clave generada que nunca
//! viaja por este struct.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::route_template::Step;

/// Estado por defecto de una ruta recién mapeada (1 = activa)
pub const STATE_ACTIVE: i32 = 1;

/// Registro persistible derivado de una `RouteTemplate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PersistedRoute {
    /// Clave de negocio: el `id` de la plantilla en la API de origen
    pub route_id: i64,
    pub name: String,
    pub number_of_legs: i32,
    pub departure_place: String,
    pub arrival_place: String,
    pub code: String,
    pub time_stamp: DateTime<Utc>,
    pub user_name: String,
    /// Sumatoria de `mileage` de todos los pasos, en metros
    pub metros: f64,
    /// Sumatoria de `duration` de todos los pasos, en segundos
    pub segundos: f64,
    /// Secuencia completa de pasos, serializada con orden preservado
    pub steps: Json<Vec<Step>>,
    pub state: i32,
    pub create_at: DateTime<Utc>,
    pub update_at: DateTime<Utc>,
}
