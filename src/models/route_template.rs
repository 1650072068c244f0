//! Modelos de dominio de plantillas de rutas
//!
//! Estos structs mapean el JSON de la API de Frotcom. La API no garantiza el
//! casing de los nombres de campo, por lo que cada campo acepta camelCase y
//! PascalCase. Los numéricos requeridos ausentes caen al cero natural; los
//! opcionales ausentes quedan en `None`.
//!
//! Los objetos son transitorios: se construyen frescos de cada respuesta y no
//! se mutan después de la construcción.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ubicación con identificador único, dirección y cliente asociado
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Identificador único del lugar
    #[serde(default, alias = "PlaceId")]
    pub place_id: i64,

    /// Dirección textual del lugar
    #[serde(default, alias = "Address")]
    pub address: String,

    /// Identificador del cliente asociado
    #[serde(default, alias = "ClientId")]
    pub client_id: i64,
}

/// Información de tiempo y distancia de un segmento de ruta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingInfo {
    /// Distancia del segmento en metros
    #[serde(default, alias = "Mileage")]
    pub mileage: f64,

    /// Duración del segmento en segundos
    #[serde(default, alias = "Duration")]
    pub duration: i64,

    /// Tiempo de descanso en segundos; ausente significa "sin descanso"
    #[serde(default, alias = "Breaks")]
    pub breaks: Option<i64>,
}

/// Paso individual dentro de una plantilla de ruta
///
/// El orden dentro de la plantilla es significativo: define la secuencia del
/// recorrido.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Identificador único del paso
    #[serde(default, alias = "Id")]
    pub id: i64,

    /// Ubicación de inicio del paso
    #[serde(default, alias = "Starts")]
    pub starts: Location,

    /// Ubicación de llegada del paso
    #[serde(default, alias = "Arrive")]
    pub arrive: Location,

    /// Información de tiempo y distancia del paso
    #[serde(default, alias = "Times")]
    pub times: TimingInfo,
}

/// Plantilla de ruta con la información completa de un recorrido logístico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTemplate {
    /// Identificador único de la plantilla
    #[serde(default, alias = "Id")]
    pub id: i64,

    /// Nombre descriptivo de la ruta
    #[serde(default, alias = "Name")]
    pub name: String,

    /// Número declarado de segmentos; advisory, puede no coincidir con
    /// `steps.len()`
    #[serde(default, alias = "NumberOfLegs")]
    pub number_of_legs: i32,

    /// Lugar de salida de la ruta
    #[serde(default, alias = "DeparturePlace")]
    pub departure_place: String,

    /// Lugar de llegada de la ruta
    #[serde(default, alias = "ArrivalPlace")]
    pub arrival_place: String,

    /// Duración total estimada en segundos
    #[serde(default, alias = "Duration")]
    pub duration: i64,

    /// Código identificador de la ruta
    #[serde(default, alias = "Code")]
    pub code: String,

    /// Color asociado a la ruta (valor numérico)
    #[serde(default, alias = "Colour")]
    pub colour: i32,

    /// Marca de tiempo de creación/modificación
    #[serde(default = "unix_epoch", alias = "Timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Usuario que creó o modificó la plantilla
    #[serde(default, alias = "Username")]
    pub username: String,

    /// Pasos ordenados que componen la ruta
    #[serde(default, alias = "Steps")]
    pub steps: Vec<Step>,

    /// Campo adicional personalizable 1
    #[serde(default, alias = "Field1")]
    pub field1: String,

    /// Campo adicional personalizable 2
    #[serde(default, alias = "Field2")]
    pub field2: String,

    /// Campo adicional personalizable 3
    #[serde(default, alias = "Field3")]
    pub field3: String,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}
