//! Orquestador del pipeline de sincronización
//!
//! Una pasada completa: verificar esquema, autenticar, consultar plantillas,
//! mapear y persistir. Las etapas son estrictamente secuenciales, sin
//! reintentos; cualquier fallo aborta las etapas restantes. Una respuesta
//! vacía corta el pipeline sin abrir transacción de persistencia.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::client::ApiClient;
use crate::models::persisted_route::PersistedRoute;
use crate::repositories::route_repository::RouteRepository;
use crate::services::route_template_service::map_to_persisted;
use crate::utils::errors::{PipelineError, PipelineStage};

/// Estado terminal de una pasada del pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Se mapearon y persistieron registros
    Completed,
    /// La API no devolvió plantillas; no se abrió transacción
    NoRecords,
}

/// Resultado de una pasada del pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub record_count: usize,
    pub status: SyncStatus,
}

/// Servicio de procesamiento: secuencia las etapas del pipeline
pub struct RouteProcessingService {
    api_client: Arc<dyn ApiClient>,
    repository: Arc<dyn RouteRepository>,
    shutdown: Arc<AtomicBool>,
}

impl RouteProcessingService {
    pub fn new(
        api_client: Arc<dyn ApiClient>,
        repository: Arc<dyn RouteRepository>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            api_client,
            repository,
            shutdown,
        }
    }

    /// Ejecuta una pasada completa del pipeline
    ///
    /// Devuelve el número de registros procesados y el estado terminal. El
    /// error de cualquier etapa se registra con su contexto y se propaga sin
    /// recuperación.
    pub async fn fetch_and_persist(&self) -> Result<SyncOutcome, PipelineError> {
        info!("Iniciando procesamiento de rutas");

        self.ensure_not_cancelled(PipelineStage::Init)?;

        self.repository
            .ensure_schema()
            .await
            .map_err(|e| self.stage_failure(PipelineStage::Init, e))?;
        debug!("Etapa {} completada", PipelineStage::SchemaEnsured);

        self.ensure_not_cancelled(PipelineStage::SchemaEnsured)?;

        let token = self
            .api_client
            .authenticate()
            .await
            .map_err(|e| self.stage_failure(PipelineStage::SchemaEnsured, e))?;

        let templates = self
            .api_client
            .fetch_route_templates(&token)
            .await
            .map_err(|e| self.stage_failure(PipelineStage::SchemaEnsured, e))?;
        debug!("Etapa {} completada", PipelineStage::Fetched);

        self.ensure_not_cancelled(PipelineStage::Fetched)?;

        if templates.is_empty() {
            warn!("No se encontraron rutas para procesar");
            debug!("Etapa {} alcanzada sin registros", PipelineStage::Done);
            return Ok(SyncOutcome {
                record_count: 0,
                status: SyncStatus::NoRecords,
            });
        }

        let routes: Vec<PersistedRoute> = templates.iter().map(map_to_persisted).collect();
        info!("Mapeando {} rutas para inserción", routes.len());
        debug!("Etapa {} completada", PipelineStage::Mapped);

        self.ensure_not_cancelled(PipelineStage::Mapped)?;

        let inserted = self
            .repository
            .upsert_many(&routes)
            .await
            .map_err(|e| self.stage_failure(PipelineStage::Mapped, e))?;
        debug!("Etapa {} completada", PipelineStage::Persisted);

        if inserted {
            info!(
                "Procesamiento completado exitosamente. {} rutas insertadas",
                routes.len()
            );
        } else {
            warn!("La operación de almacenamiento no afectó ningún registro");
        }

        Ok(SyncOutcome {
            record_count: routes.len(),
            status: SyncStatus::Completed,
        })
    }

    /// Cancelación cooperativa, verificada antes de iniciar cada etapa
    fn ensure_not_cancelled(&self, stage: PipelineStage) -> Result<(), PipelineError> {
        if self.shutdown.load(Ordering::Relaxed) {
            warn!("🛑 Cancelación solicitada en la etapa {}", stage);
            return Err(PipelineError::Cancelled(stage));
        }
        Ok(())
    }

    fn stage_failure<E: Into<PipelineError>>(&self, stage: PipelineStage, e: E) -> PipelineError {
        let err = e.into();
        error!("❌ Fallo del pipeline tras la etapa {}: {}", stage, err);
        err
    }
}
