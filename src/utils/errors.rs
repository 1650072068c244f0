//! Sistema de manejo de errores
//!
//! Este módulo define la taxonomía de errores del pipeline de sincronización:
//! autenticación, consumo de la API y almacenamiento, más el error de pipeline
//! que los envuelve con la etapa en la que ocurrieron.

use std::fmt;

use thiserror::Error;

/// Errores de autenticación contra la API de Frotcom
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Transport error while requesting access token: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Authentication endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode authentication response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Authentication succeeded but returned an empty token")]
    EmptyToken,
}

/// Errores al consumir el endpoint de plantillas de rutas
///
/// Cada variante es distinguible para que el orquestador pueda registrar
/// el fallo con el contexto adecuado.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error while fetching route templates: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Route templates endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode route templates JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Errores de almacenamiento
///
/// Fallos de conexión, de creación de esquema y de upsert se reportan con el
/// mismo tipo; el lote completo ya fue revertido cuando este error aparece.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Etapas del pipeline, usadas como contexto en logs y errores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    SchemaEnsured,
    Fetched,
    Mapped,
    Persisted,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Init => "Init",
            PipelineStage::SchemaEnsured => "SchemaEnsured",
            PipelineStage::Fetched => "Fetched",
            PipelineStage::Mapped => "Mapped",
            PipelineStage::Persisted => "Persisted",
            PipelineStage::Done => "Done",
        };
        write!(f, "{}", name)
    }
}

/// Error terminal del pipeline
///
/// Cualquier fallo de etapa aborta las etapas restantes; nada se reintenta.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Pipeline cancelled while in stage {0}")]
    Cancelled(PipelineStage),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_preserves_storage_cause() {
        let storage = StorageError::Database(sqlx::Error::PoolClosed);
        let err = PipelineError::from(storage);
        assert!(matches!(err, PipelineError::Storage(_)));
        assert!(err.to_string().contains("Storage operation failed"));
    }

    #[test]
    fn stage_names_are_stable() {
        assert_eq!(PipelineStage::Init.to_string(), "Init");
        assert_eq!(PipelineStage::Done.to_string(), "Done");
    }
}
