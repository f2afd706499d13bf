//! View layer: per-view state machines over the gateway.
//!
//! Each view owns its own list or draft state; nothing is shared between
//! view instances. Network interaction is modeled as an explicit state
//! machine so every rendering branch is total.

pub mod clientes;
pub mod usuarios;

pub use clientes::{
    filtrar, ClienteFormView, ClienteListView, DashboardStats, FiltroTemperatura, Secao,
};
pub use usuarios::UserAdminView;

/// Lifecycle of one view's network interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Outcome of a guarded destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmed {
    /// The action ran and the view reloaded from the backend.
    Deleted,
    /// The confirmation was declined; no request was issued.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_state_accessors() {
        let state: LoadState<Vec<i32>> = LoadState::Loaded(vec![1, 2]);
        assert_eq!(state.loaded().map(Vec::len), Some(2));
        assert!(state.error().is_none());

        let failed: LoadState<Vec<i32>> = LoadState::Failed("offline".to_string());
        assert_eq!(failed.error(), Some("offline"));
        assert!(!failed.is_loading());
    }
}
