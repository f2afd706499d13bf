//! Wire models shared by the gateway and the views.

pub mod cliente;
pub mod user;

pub use cliente::{Cliente, ClienteDraft, Evento, Foto, NovoEvento, StatusPipeline, Temperatura};
pub use user::{
    AtualizaUsuario, InitAdminResponse, LoginRequest, LoginResponse, MessageResponse, NovoUsuario,
    Role, User,
};
