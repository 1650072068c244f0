//! Cliente HTTP para la API de Frotcom
//!
//! Este módulo contiene el cliente HTTP que cubre los dos endpoints que
//! consume el pipeline: la autenticación (POST de credenciales a cambio de un
//! token de corta duración) y la consulta de plantillas de rutas (GET con el
//! token como credencial de query). Hay un único camino de consulta y todas
//! las URLs provienen de la configuración.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::environment::{ApiConfiguration, AuthenticationSettings};
use crate::models::route_template::RouteTemplate;
use crate::utils::errors::{AuthError, FetchError};

/// Token de acceso opaco devuelto por la autenticación
///
/// La API no documenta su vigencia; se solicita uno nuevo en cada pasada del
/// pipeline y nunca se cachea entre pasadas.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    #[serde(default, alias = "Token")]
    pub token: String,
}

/// Credenciales enviadas en el cuerpo del POST de autenticación
#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    provider: &'a str,
    username: &'a str,
    password: &'a str,
}

/// Operaciones remotas que necesita el pipeline
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Intercambia las credenciales configuradas por un token de acceso
    async fn authenticate(&self) -> Result<AuthToken, AuthError>;

    /// Obtiene todas las plantillas de rutas; una lista vacía es un resultado
    /// válido, no un error
    async fn fetch_route_templates(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<RouteTemplate>, FetchError>;
}

/// Cliente HTTP para Frotcom (autenticación + plantillas de rutas)
pub struct FrotcomClient {
    client: Client,
    api: ApiConfiguration,
    auth: AuthenticationSettings,
}

impl FrotcomClient {
    /// Crea el cliente con el timeout configurado
    pub fn new(
        api: ApiConfiguration,
        auth: AuthenticationSettings,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(api.timeout()).build()?;

        Ok(Self { client, api, auth })
    }
}

#[async_trait]
impl ApiClient for FrotcomClient {
    async fn authenticate(&self) -> Result<AuthToken, AuthError> {
        info!("🔐 Solicitando token de acceso a {}", self.auth.base_url);

        let body = AuthRequest {
            provider: &self.auth.provider,
            username: &self.auth.username,
            password: &self.auth.password,
        };

        let response = self
            .client
            .post(&self.auth.base_url)
            .json(&body)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Status { status, body });
        }

        let token: AuthToken = response.json().await.map_err(AuthError::Decode)?;

        // Un 2xx con token vacío sigue siendo un fallo de autenticación; no
        // se continúa con una credencial que el fetch rechazará después.
        if token.token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }

        debug!("Token de acceso obtenido");
        Ok(token)
    }

    async fn fetch_route_templates(
        &self,
        token: &AuthToken,
    ) -> Result<Vec<RouteTemplate>, FetchError> {
        info!(
            "🚚 Consultando plantillas de rutas en {}",
            self.api.base_url
        );

        let url = format!("{}?api_key={}", self.api.base_url, token.token);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        // El endpoint puede responder `null` en lugar de `[]`
        let templates: Option<Vec<RouteTemplate>> =
            response.json().await.map_err(FetchError::Decode)?;
        let templates = templates.unwrap_or_default();

        debug!("Respuesta deserializada: {} plantillas", templates.len());
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_token_accepts_both_casings() {
        let token: AuthToken = serde_json::from_str(r#"{"token": "abc-123"}"#).unwrap();
        assert_eq!(token.token, "abc-123");

        let token: AuthToken = serde_json::from_str(r#"{"Token": "abc-123"}"#).unwrap();
        assert_eq!(token.token, "abc-123");
    }

    #[test]
    fn auth_token_defaults_to_empty_when_absent() {
        let token: AuthToken = serde_json::from_str("{}").unwrap();
        assert!(token.token.is_empty());
    }
}
