//! User administration view. Manager-only; the router gates it before a
//! single request is issued, and the backend enforces it again.

use tracing::info;

use crate::gateway::{ApiClient, GatewayError};
use crate::models::{AtualizaUsuario, NovoUsuario, Role, User};
use crate::views::{Confirmed, LoadState};

pub struct UserAdminView {
    state: LoadState<Vec<User>>,
}

impl Default for UserAdminView {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAdminView {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<User>> {
        &self.state
    }

    pub async fn load(&mut self, client: &ApiClient) -> Result<(), GatewayError> {
        self.state = LoadState::Loading;
        match client.list_usuarios().await {
            Ok(usuarios) => {
                self.state = LoadState::Loaded(usuarios);
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn usuarios(&self) -> &[User] {
        self.state.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Creates an account. Every field, password included, is required
    /// here; only updates may leave the password alone.
    pub async fn create(
        &mut self,
        client: &ApiClient,
        nome: String,
        email: String,
        senha: String,
        tipo: Role,
    ) -> Result<String, GatewayError> {
        let payload = NovoUsuario {
            nome,
            email,
            senha,
            tipo,
        };
        let response = client.create_usuario(&payload).await?;
        info!(email = %payload.email, "user created");
        self.load(client).await?;
        Ok(response.message)
    }

    /// Updates an account. A blank password input keeps the stored one:
    /// the payload simply carries no `senha` key.
    pub async fn update(
        &mut self,
        client: &ApiClient,
        id: i64,
        nome: String,
        email: String,
        tipo: Role,
        senha_input: &str,
    ) -> Result<String, GatewayError> {
        let payload = AtualizaUsuario {
            nome,
            email,
            tipo,
            ativo: None,
            senha: AtualizaUsuario::senha_from_form(senha_input),
        };
        let response = client.update_usuario(id, &payload).await?;
        info!(user_id = id, "user updated");
        self.load(client).await?;
        Ok(response.message)
    }

    /// Deactivates an account after confirmation; the backend keeps the
    /// row and flips `ativo`. The list is reloaded from the backend.
    pub async fn deactivate(
        &mut self,
        client: &ApiClient,
        id: i64,
        confirm: impl FnOnce() -> bool,
    ) -> Result<Confirmed, GatewayError> {
        if !confirm() {
            return Ok(Confirmed::Cancelled);
        }
        client.deactivate_usuario(id).await?;
        info!(user_id = id, "user deactivated");
        self.load(client).await?;
        Ok(Confirmed::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9/api", Some(1)).unwrap()
    }

    #[tokio::test]
    async fn test_deactivate_cancelado_nao_emite_requisicao() {
        let client = unreachable_client();
        let mut view = UserAdminView::new();
        let outcome = view.deactivate(&client, 5, || false).await.unwrap();
        assert_eq!(outcome, Confirmed::Cancelled);
        // Still idle: no load was triggered either.
        assert_eq!(view.state(), &LoadState::Idle);
    }

    #[tokio::test]
    async fn test_load_failure_enters_failed_state() {
        let client = unreachable_client();
        let mut view = UserAdminView::new();
        assert!(view.load(&client).await.is_err());
        assert!(view.state().error().is_some());
        assert!(view.usuarios().is_empty());
    }
}
