//! Visualización de plantillas de rutas en consola
//!
//! Presentación pura sobre los agregados de solo lectura; un fallo aquí se
//! reporta en pantalla sin abortar la aplicación.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::client::ApiClient;
use crate::models::route_template::RouteTemplate;
use crate::services::route_template_service::{calculate_total_distance, format_duration};
use crate::utils::errors::PipelineError;

/// Servicio de aplicación para mostrar información de rutas en consola
pub struct RouteDisplayService {
    api_client: Arc<dyn ApiClient>,
}

impl RouteDisplayService {
    pub fn new(api_client: Arc<dyn ApiClient>) -> Self {
        Self { api_client }
    }

    /// Muestra todas las plantillas de rutas en formato de consola
    pub async fn display_all_route_templates(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║                    PLANTILLAS DE RUTAS                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();

        info!("Iniciando visualización de plantillas de rutas");

        let templates = match self.fetch_templates().await {
            Ok(templates) => templates,
            Err(e) => {
                error!("Error al mostrar las plantillas de rutas: {}", e);
                println!("❌ Error al obtener las plantillas de rutas: {}", e);
                return;
            }
        };

        if templates.is_empty() {
            println!("⚠️  No se encontraron plantillas de rutas.");
            return;
        }

        for (i, template) in templates.iter().enumerate() {
            println!("🚛 RUTA {} de {}", i + 1, templates.len());
            println!("{}", "─".repeat(80));
            display_route_template(template);
            println!();
        }

        display_summary(&templates);

        info!("Visualización completada exitosamente");
    }

    async fn fetch_templates(&self) -> Result<Vec<RouteTemplate>, PipelineError> {
        let token = self.api_client.authenticate().await?;
        Ok(self.api_client.fetch_route_templates(&token).await?)
    }
}

/// Muestra una plantilla de ruta con formato detallado
fn display_route_template(template: &RouteTemplate) {
    let total_distance = calculate_total_distance(template);
    let formatted_duration = format_duration(template.duration);

    println!("📋 ID: {}", template.id);
    println!("🏷️  Nombre: {}", template.name);
    println!("🔗 Código: {}", template.code);
    println!("📍 Origen: {}", template.departure_place);
    println!("🎯 Destino: {}", template.arrival_place);
    println!("⏱️  Duración: {}", formatted_duration);
    println!(
        "📏 Distancia Total: {:.0} metros ({:.1} km)",
        total_distance,
        total_distance / 1000.0
    );
    println!("🔢 Número de Segmentos: {}", template.number_of_legs);
    println!("👤 Usuario: {}", template.username);
    println!("📅 Fecha: {}", template.timestamp.format("%Y-%m-%d %H:%M:%S"));

    if !template.steps.is_empty() {
        println!("📋 SEGMENTOS DE LA RUTA:");
        for (i, step) in template.steps.iter().enumerate() {
            let step_duration = format_duration(step.times.duration);

            println!(
                "   {:02}. {} → {}",
                i + 1,
                step.starts.address,
                step.arrive.address
            );
            println!("       📏 {:.0}m | ⏱️ {}", step.times.mileage, step_duration);

            if let Some(breaks) = step.times.breaks {
                if breaks > 0 {
                    println!("       ☕ Descanso: {}", format_duration(breaks));
                }
            }
        }
    }
}

/// Muestra un resumen estadístico de todas las rutas
fn display_summary(templates: &[RouteTemplate]) {
    if templates.is_empty() {
        return;
    }

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                        RESUMEN                               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");

    let total_routes = templates.len();
    let total_distance: f64 = templates.iter().map(calculate_total_distance).sum();
    let total_duration: i64 = templates.iter().map(|t| t.duration).sum();
    let average_legs: f64 = templates
        .iter()
        .map(|t| t.number_of_legs as f64)
        .sum::<f64>()
        / total_routes as f64;

    let mut routes_by_user: HashMap<&str, usize> = HashMap::new();
    for template in templates {
        *routes_by_user.entry(template.username.as_str()).or_default() += 1;
    }
    let mut by_user: Vec<(&str, usize)> = routes_by_user.into_iter().collect();
    by_user.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    println!("📊 Total de Rutas: {}", total_routes);
    println!(
        "📏 Distancia Total: {:.0} metros ({:.1} km)",
        total_distance,
        total_distance / 1000.0
    );
    println!("⏱️  Duración Total: {}", format_duration(total_duration));
    println!("📊 Promedio de Segmentos: {:.1}", average_legs);
    println!();
    println!("👥 Rutas por Usuario:");
    for (user, count) in by_user {
        println!("   • {}: {} rutas", user, count);
    }
    println!();
}
