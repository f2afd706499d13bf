//! HTTP gateway to the AgroCRM backend.
//!
//! One request primitive plus a thin method per backend operation. The
//! gateway owns no state beyond the base URL and the credential it was
//! handed; it never decides anything, it only transports.

mod error;

pub use error::GatewayError;

use error::ErrorBody;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::models::{
    AtualizaUsuario, Cliente, ClienteDraft, Evento, InitAdminResponse, LoginRequest,
    LoginResponse, MessageResponse, NovoEvento, NovoUsuario, User,
};

/// Default request timeout; the backend is expected to answer well within it.
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS)))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Installs or clears the bearer credential. Only the session store
    /// calls this; everything else treats the credential as read-only.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The single request primitive. Serializes `body` as JSON, attaches
    /// the bearer header when a credential is present, and parses the
    /// response body regardless of status: on failure the backend's
    /// `message` field becomes the error, with a generic fallback.
    async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "gateway request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| generic_failure(status));
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request::<(), T>(Method::DELETE, path, None).await
    }

    // --- authentication ---

    pub async fn login(&self, email: &str, senha: &str) -> Result<LoginResponse, GatewayError> {
        self.post(
            "/auth/login",
            &LoginRequest {
                email: email.to_string(),
                senha: senha.to_string(),
            },
        )
        .await
    }

    pub async fn me(&self) -> Result<User, GatewayError> {
        self.get("/auth/me").await
    }

    // --- user administration (manager-only endpoints) ---

    pub async fn list_usuarios(&self) -> Result<Vec<User>, GatewayError> {
        self.get("/auth/users").await
    }

    pub async fn create_usuario(&self, usuario: &NovoUsuario) -> Result<MessageResponse, GatewayError> {
        self.post("/auth/register", usuario).await
    }

    pub async fn update_usuario(
        &self,
        id: i64,
        usuario: &AtualizaUsuario,
    ) -> Result<MessageResponse, GatewayError> {
        self.put(&format!("/auth/users/{id}"), usuario).await
    }

    /// Soft delete: the backend flips `ativo` to false instead of removing
    /// the row.
    pub async fn deactivate_usuario(&self, id: i64) -> Result<MessageResponse, GatewayError> {
        self.delete(&format!("/auth/users/{id}")).await
    }

    // --- customer records ---

    pub async fn list_clientes(&self) -> Result<Vec<Cliente>, GatewayError> {
        self.get("/clientes").await
    }

    pub async fn get_cliente(&self, id: i64) -> Result<Cliente, GatewayError> {
        self.get(&format!("/clientes/{id}")).await
    }

    pub async fn create_cliente(&self, draft: &ClienteDraft) -> Result<Cliente, GatewayError> {
        self.post("/clientes", draft).await
    }

    pub async fn update_cliente(
        &self,
        id: i64,
        draft: &ClienteDraft,
    ) -> Result<Cliente, GatewayError> {
        self.put(&format!("/clientes/{id}"), draft).await
    }

    pub async fn delete_cliente(&self, id: i64) -> Result<MessageResponse, GatewayError> {
        self.delete(&format!("/clientes/{id}")).await
    }

    // --- interaction history ---

    pub async fn append_historico(
        &self,
        cliente_id: i64,
        evento: &NovoEvento,
    ) -> Result<Evento, GatewayError> {
        self.post(&format!("/clientes/{cliente_id}/historico"), evento)
            .await
    }

    pub async fn remove_historico(
        &self,
        cliente_id: i64,
        evento_id: i64,
    ) -> Result<MessageResponse, GatewayError> {
        self.delete(&format!("/clientes/{cliente_id}/historico/{evento_id}"))
            .await
    }

    // --- bootstrap ---

    /// Creates the default manager account when none exists yet. The only
    /// unauthenticated operation besides login; carries no body.
    pub async fn init_admin(&self) -> Result<InitAdminResponse, GatewayError> {
        self.request::<(), _>(Method::POST, "/init-admin", None).await
    }
}

fn generic_failure(status: StatusCode) -> String {
    format!("Erro na requisição ({})", status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/api/", None).unwrap();
        assert_eq!(client.base_url, "http://localhost:5000/api");
    }

    #[test]
    fn test_token_slot_starts_empty() {
        let mut client = ApiClient::new("http://localhost:5000/api", None).unwrap();
        assert!(!client.has_token());
        client.set_token(Some("abc".to_string()));
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }

    #[test]
    fn test_generic_failure_message() {
        assert_eq!(generic_failure(StatusCode::BAD_GATEWAY), "Erro na requisição (502)");
    }
}
