//! Agregación y mapeo de plantillas de rutas
//!
//! Funciones puras sobre `RouteTemplate`: totales por plantilla, formato de
//! duraciones y la proyección a `PersistedRoute`. Los pasos ausentes o vacíos
//! producen agregados en cero; el mapeo nunca falla.

use chrono::Utc;
use sqlx::types::Json;
use tracing::warn;

use crate::models::persisted_route::{PersistedRoute, STATE_ACTIVE};
use crate::models::route_template::RouteTemplate;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Calcula la distancia total de una plantilla en metros
pub fn calculate_total_distance(template: &RouteTemplate) -> f64 {
    template.steps.iter().map(|step| step.times.mileage).sum()
}

/// Calcula la duración total de una plantilla en segundos
pub fn calculate_total_duration(template: &RouteTemplate) -> f64 {
    template
        .steps
        .iter()
        .map(|step| step.times.duration as f64)
        .sum()
}

/// Formatea una duración en segundos con la unidad mayor primero
///
/// Precondición: la duración no es negativa.
pub fn format_duration(total_seconds: i64) -> String {
    debug_assert!(total_seconds >= 0, "duration must be non-negative");

    let days = total_seconds / SECONDS_PER_DAY;
    let hours = (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;

    if days >= 1 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours >= 1 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

/// Proyecta una plantilla al registro persistible
///
/// `create_at` y `update_at` se fijan al instante del mapeo, en UTC; el
/// repositorio conserva el `create_at` original cuando la ruta ya existe.
pub fn map_to_persisted(template: &RouteTemplate) -> PersistedRoute {
    if !template.steps.is_empty() && template.number_of_legs as usize != template.steps.len() {
        warn!(
            "La ruta {} declara {} segmentos pero contiene {}",
            template.id,
            template.number_of_legs,
            template.steps.len()
        );
    }

    let now = Utc::now();

    PersistedRoute {
        route_id: template.id,
        name: template.name.clone(),
        number_of_legs: template.number_of_legs,
        departure_place: template.departure_place.clone(),
        arrival_place: template.arrival_place.clone(),
        code: template.code.clone(),
        time_stamp: template.timestamp,
        user_name: template.username.clone(),
        metros: calculate_total_distance(template),
        segundos: calculate_total_duration(template),
        steps: Json(template.steps.clone()),
        state: STATE_ACTIVE,
        create_at: now,
        update_at: now,
    }
}
