//! Session store: the single owner of the persisted credential slot and
//! the in-memory identity.
//!
//! The credential is one opaque token string kept at `<data_dir>/token`.
//! Every mutation of the slot goes through this type; the gateway and the
//! router only ever read the resulting state.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::gateway::ApiClient;
use crate::models::User;
use crate::router::SessionState;

const TOKEN_FILE: &str = "token";

pub struct SessionStore {
    data_dir: PathBuf,
    token_path: PathBuf,
    user: Option<User>,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            token_path: data_dir.join(TOKEN_FILE),
            user: None,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Reads the persisted credential, if any.
    pub fn stored_token(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read credential file: {}", self.token_path.display())
            }),
        }
    }

    fn persist_token(&self, token: &str) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })?;
        fs::write(&self.token_path, token).with_context(|| {
            format!("Failed to write credential file: {}", self.token_path.display())
        })
    }

    fn clear_token(&self) {
        if let Err(e) = fs::remove_file(&self.token_path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove credential file: {e}");
            }
        }
    }

    /// Resolves the session on startup.
    ///
    /// An explicit credential (flag or env) is used for this invocation
    /// only and never written to the slot. Otherwise the persisted token
    /// is validated against `/auth/me`; any failure, rejected token or
    /// unreachable backend alike, discards the slot and leaves the
    /// session unauthenticated.
    pub async fn bootstrap(
        &mut self,
        client: &mut ApiClient,
        explicit_token: Option<String>,
    ) -> Result<SessionState> {
        if let Some(token) = explicit_token {
            client.set_token(Some(token));
            return match client.me().await {
                Ok(user) => {
                    self.user = Some(user.clone());
                    Ok(SessionState::from_user(user))
                }
                Err(e) => {
                    client.set_token(None);
                    warn!("Explicit credential rejected: {e}");
                    Ok(SessionState::Unauthenticated)
                }
            };
        }

        let Some(token) = self.stored_token()? else {
            debug!("No stored credential");
            return Ok(SessionState::Unauthenticated);
        };

        client.set_token(Some(token));
        match client.me().await {
            Ok(user) => {
                self.user = Some(user.clone());
                Ok(SessionState::from_user(user))
            }
            Err(e) => {
                warn!("Stored credential rejected, clearing it: {e}");
                client.set_token(None);
                self.clear_token();
                Ok(SessionState::Unauthenticated)
            }
        }
    }

    /// Authenticates and takes ownership of the returned credential.
    /// Gateway errors pass through unchanged so the caller can show the
    /// backend's own message.
    pub async fn login(
        &mut self,
        client: &mut ApiClient,
        email: &str,
        senha: &str,
    ) -> Result<SessionState> {
        let response = client.login(email, senha).await?;
        self.persist_token(&response.token)?;
        client.set_token(Some(response.token));
        self.user = Some(response.user.clone());
        Ok(SessionState::from_user(response.user))
    }

    /// Clears the slot and the identity. Safe to call any number of times.
    pub fn logout(&mut self, client: &mut ApiClient) -> SessionState {
        self.clear_token();
        self.user = None;
        client.set_token(None);
        SessionState::Unauthenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::TempDir;

    fn unreachable_client() -> ApiClient {
        // Nothing listens on the discard port; every call fails fast.
        ApiClient::new("http://127.0.0.1:9/api", Some(1)).unwrap()
    }

    #[test]
    fn test_stored_token_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.stored_token().unwrap().is_none());

        store.persist_token("abc123").unwrap();
        assert_eq!(store.stored_token().unwrap().as_deref(), Some("abc123"));

        store.clear_token();
        assert!(store.stored_token().unwrap().is_none());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::new(dir.path());
        let mut client = unreachable_client();
        store.persist_token("abc123").unwrap();

        assert_eq!(store.logout(&mut client), SessionState::Unauthenticated);
        assert_eq!(store.logout(&mut client), SessionState::Unauthenticated);
        assert!(store.stored_token().unwrap().is_none());
        assert!(store.current_user().is_none());
        assert!(!client.has_token());
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_is_unauthenticated() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::new(dir.path());
        let mut client = unreachable_client();

        let state = store.bootstrap(&mut client, None).await.unwrap();
        assert_eq!(state, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_bootstrap_with_unresolvable_token_clears_slot() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::new(dir.path());
        let mut client = unreachable_client();
        store.persist_token("stale-token").unwrap();

        let state = store.bootstrap(&mut client, None).await.unwrap();
        assert_eq!(state, SessionState::Unauthenticated);
        assert!(store.stored_token().unwrap().is_none());
        assert!(!client.has_token());
    }

    #[tokio::test]
    async fn test_explicit_token_never_touches_slot() {
        let dir = TempDir::new().unwrap();
        let mut store = SessionStore::new(dir.path());
        let mut client = unreachable_client();
        store.persist_token("persisted").unwrap();

        let state = store
            .bootstrap(&mut client, Some("explicit".to_string()))
            .await
            .unwrap();
        assert_eq!(state, SessionState::Unauthenticated);
        // The persisted slot belongs to the interactive session and
        // survives a failed one-shot credential.
        assert_eq!(store.stored_token().unwrap().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_from_user_maps_roles() {
        let user = User {
            id: 1,
            nome: "Ana".to_string(),
            email: "ana@agrocrm.com".to_string(),
            tipo: Role::Vendedor,
            ativo: true,
            criado_em: None,
        };
        assert!(matches!(SessionState::from_user(user), SessionState::Vendedor(_)));
    }
}
