//! User and authentication wire models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role. The backend knows exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendedor,
    Gerente,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendedor => "vendedor",
            Role::Gerente => "gerente",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendedor" => Ok(Role::Vendedor),
            "gerente" => Ok(Role::Gerente),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A system account as the backend returns it. The password never travels
/// in this direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub tipo: Role,
    #[serde(default = "default_ativo")]
    pub ativo: bool,
    #[serde(default)]
    pub criado_em: Option<NaiveDateTime>,
}

fn default_ativo() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Payload for creating an account. All fields are required by the backend.
#[derive(Debug, Serialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub tipo: Role,
}

/// Payload for updating an account. A blank password means "keep the
/// current one", encoded by leaving the `senha` key out of the JSON
/// entirely rather than sending an empty string.
#[derive(Debug, Serialize)]
pub struct AtualizaUsuario {
    pub nome: String,
    pub email: String,
    pub tipo: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ativo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
}

impl AtualizaUsuario {
    /// Normalizes a form's password field: empty or whitespace-only input
    /// keeps the existing password.
    pub fn senha_from_form(input: &str) -> Option<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// `{message}` envelope used by delete/confirmation style responses.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response of the one-shot admin bootstrap. Echoes the seeded credentials.
#[derive(Debug, Deserialize)]
pub struct InitAdminResponse {
    pub message: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub senha: Option<String>,
}
