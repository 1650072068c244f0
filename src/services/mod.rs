//! Services module
//!
//! Este módulo contiene la lógica de negocio de la sincronización: agregación
//! y mapeo, orquestación del pipeline y presentación en consola.

pub mod route_display_service;
pub mod route_processing_service;
pub mod route_template_service;

pub use route_display_service::RouteDisplayService;
pub use route_processing_service::{RouteProcessingService, SyncOutcome, SyncStatus};
pub use route_template_service::*;
