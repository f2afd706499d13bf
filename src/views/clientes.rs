//! Customer list and form views.
//!
//! The list loads the whole record set once (the backend scopes it to the
//! caller) and filters locally; filtering is pure and never touches the
//! network. The form keeps one draft shared by its sections and submits
//! it whole on save.

use anyhow::{Context, Result};
use tracing::info;

use crate::gateway::{ApiClient, GatewayError};
use crate::models::{Cliente, ClienteDraft, Evento, NovoEvento, Temperatura, User};
use crate::router::{Route, SessionState};
use crate::views::{Confirmed, LoadState};

/// Temperature facet of the list filter. `Todas` disables the facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FiltroTemperatura {
    #[default]
    Todas,
    Apenas(Temperatura),
}

impl std::str::FromStr for FiltroTemperatura {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("todas") {
            Ok(FiltroTemperatura::Todas)
        } else {
            s.parse().map(FiltroTemperatura::Apenas)
        }
    }
}

/// Case-insensitive substring match over name and city, intersected with
/// an exact temperature match when one is selected. Pure; an empty query
/// with `Todas` is the identity.
pub fn filtrar<'a>(
    clientes: &'a [Cliente],
    busca: &str,
    filtro: FiltroTemperatura,
) -> Vec<&'a Cliente> {
    let busca = busca.to_lowercase();
    clientes
        .iter()
        .filter(|cliente| {
            let match_nome = cliente.nome.to_lowercase().contains(&busca);
            let match_cidade = cliente.cidade.to_lowercase().contains(&busca);
            let match_temperatura = match filtro {
                FiltroTemperatura::Todas => true,
                FiltroTemperatura::Apenas(t) => cliente.temperatura == t,
            };
            (match_nome || match_cidade) && match_temperatura
        })
        .collect()
}

/// Headline numbers shown on both dashboards, computed over the
/// unfiltered list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardStats {
    pub total_clientes: usize,
    pub valor_total: f64,
    pub clientes_quentes: usize,
    pub clientes_faturamento: usize,
}

impl DashboardStats {
    pub fn compute(clientes: &[Cliente]) -> Self {
        Self {
            total_clientes: clientes.len(),
            valor_total: clientes.iter().filter_map(|c| c.valor).sum(),
            clientes_quentes: clientes
                .iter()
                .filter(|c| c.temperatura == Temperatura::Quente)
                .count(),
            clientes_faturamento: clientes.iter().filter(|c| c.status.em_faturamento()).count(),
        }
    }
}

/// The list view: one load, then local filtering.
pub struct ClienteListView {
    state: LoadState<Vec<Cliente>>,
    pub busca: String,
    pub filtro: FiltroTemperatura,
}

impl Default for ClienteListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ClienteListView {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            busca: String::new(),
            filtro: FiltroTemperatura::Todas,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Cliente>> {
        &self.state
    }

    pub async fn load(&mut self, client: &ApiClient) -> Result<(), GatewayError> {
        self.state = LoadState::Loading;
        match client.list_clientes().await {
            Ok(clientes) => {
                self.state = LoadState::Loaded(clientes);
                Ok(())
            }
            Err(e) => {
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// The rows currently visible under the active filter.
    pub fn visiveis(&self) -> Vec<&Cliente> {
        match self.state.loaded() {
            Some(clientes) => filtrar(clientes, &self.busca, self.filtro),
            None => Vec::new(),
        }
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(self.state.loaded().map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Deletes a record after explicit confirmation, then reloads the list
    /// from the backend rather than dropping the row locally. Declining
    /// issues no request at all.
    pub async fn delete(
        &mut self,
        client: &ApiClient,
        id: i64,
        confirm: impl FnOnce() -> bool,
    ) -> Result<Confirmed, GatewayError> {
        if !confirm() {
            return Ok(Confirmed::Cancelled);
        }
        client.delete_cliente(id).await?;
        info!(cliente_id = id, "record deleted");
        self.load(client).await?;
        Ok(Confirmed::Deleted)
    }
}

/// Sections of the record form. They all edit the same draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secao {
    Dados,
    Negociacao,
    Faturamento,
    Historico,
}

/// The detail/edit view: a single in-memory draft, saved whole.
pub struct ClienteFormView {
    pub cliente_id: Option<i64>,
    pub draft: ClienteDraft,
    pub historico: Vec<Evento>,
    pub secao: Secao,
}

impl ClienteFormView {
    /// A blank form for a new record.
    pub fn novo() -> Self {
        Self {
            cliente_id: None,
            draft: ClienteDraft::default(),
            historico: Vec::new(),
            secao: Secao::Dados,
        }
    }

    /// Loads an existing record into the form.
    pub async fn carregar(client: &ApiClient, id: i64) -> Result<Self, GatewayError> {
        let cliente = client.get_cliente(id).await?;
        Ok(Self {
            cliente_id: Some(cliente.id),
            draft: ClienteDraft::from(&cliente),
            historico: cliente.historico,
            secao: Secao::Dados,
        })
    }

    /// Submits the whole draft as one upsert: create without an id, update
    /// with one. Returns the saved record and the route to navigate back
    /// to, which is the caller's role-appropriate list.
    pub async fn salvar(
        &mut self,
        client: &ApiClient,
        session: &SessionState,
    ) -> Result<(Cliente, Route), GatewayError> {
        let salvo = match self.cliente_id {
            None => client.create_cliente(&self.draft).await?,
            Some(id) => client.update_cliente(id, &self.draft).await?,
        };
        self.cliente_id = Some(salvo.id);
        info!(cliente_id = salvo.id, nome = %salvo.nome, "record saved");
        let volta = session.home().unwrap_or(Route::Login);
        Ok((salvo, volta))
    }

    /// Appends an interaction: persists through the gateway and prepends
    /// the event locally so the history stays most-recent-first. The
    /// acting user's name rides along as author.
    pub async fn adicionar_evento(
        &mut self,
        client: &ApiClient,
        usuario: &User,
        evento: &str,
        descricao: Option<String>,
    ) -> Result<&Evento> {
        let id = self
            .cliente_id
            .context("history can only be appended to a saved record")?;
        let payload = NovoEvento {
            evento: evento.to_string(),
            descricao,
        };
        let criado = client.append_historico(id, &payload).await?;
        self.prepend_evento(criado, usuario);
        Ok(&self.historico[0])
    }

    fn prepend_evento(&mut self, mut evento: Evento, usuario: &User) {
        if evento.usuario_nome.is_none() {
            evento.usuario_nome = Some(usuario.nome.clone());
        }
        self.historico.insert(0, evento);
    }

    /// Removes one event by id, after confirmation. Events are never
    /// edited in place.
    pub async fn remover_evento(
        &mut self,
        client: &ApiClient,
        evento_id: i64,
        confirm: impl FnOnce() -> bool,
    ) -> Result<Confirmed> {
        if !confirm() {
            return Ok(Confirmed::Cancelled);
        }
        let id = self
            .cliente_id
            .context("history can only be removed from a saved record")?;
        client.remove_historico(id, evento_id).await?;
        self.historico.retain(|e| e.id != evento_id);
        Ok(Confirmed::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, StatusPipeline};
    use chrono::Utc;

    fn cliente(id: i64, nome: &str, cidade: &str, temperatura: Temperatura) -> Cliente {
        Cliente {
            id,
            nome: nome.to_string(),
            telefone: "(62) 98888-0000".to_string(),
            cidade: cidade.to_string(),
            fazenda: None,
            coordenadas: None,
            area: 500.0,
            maquinas: "1 trator".to_string(),
            temperatura,
            valor: Some(100_000.0),
            oportunidades: None,
            pendencias: None,
            status: StatusPipeline::InicioRelacionamento,
            data_faturamento: None,
            observacoes_faturamento: None,
            criado_em: None,
            atualizado_em: None,
            criado_por: Some(1),
            historico: Vec::new(),
            fotos: Vec::new(),
        }
    }

    fn usuario() -> User {
        User {
            id: 2,
            nome: "Carlos".to_string(),
            email: "carlos@agrocrm.com".to_string(),
            tipo: Role::Vendedor,
            ativo: true,
            criado_em: None,
        }
    }

    fn evento_local(id: i64, evento: &str, usuario: &User) -> Evento {
        Evento {
            id,
            cliente_id: None,
            evento: evento.to_string(),
            descricao: None,
            data: Utc::now().naive_utc(),
            usuario_id: Some(usuario.id),
            usuario_nome: None,
        }
    }

    fn amostra() -> Vec<Cliente> {
        vec![
            cliente(1, "Fazenda Teste", "Rio Verde", Temperatura::Fria),
            cliente(2, "Sítio Alegre", "Jataí", Temperatura::Quente),
            cliente(3, "Agropecuária Sul", "rio verde", Temperatura::Morna),
        ]
    }

    #[test]
    fn test_filtro_vazio_e_identidade() {
        let clientes = amostra();
        let visiveis = filtrar(&clientes, "", FiltroTemperatura::Todas);
        assert_eq!(visiveis.len(), clientes.len());
    }

    #[test]
    fn test_filtro_busca_nome_ou_cidade_sem_caso() {
        let clientes = amostra();
        let por_nome = filtrar(&clientes, "fazenda", FiltroTemperatura::Todas);
        assert_eq!(por_nome.len(), 1);
        assert_eq!(por_nome[0].id, 1);

        let por_cidade = filtrar(&clientes, "RIO VERDE", FiltroTemperatura::Todas);
        assert_eq!(por_cidade.len(), 2);
    }

    #[test]
    fn test_filtro_intersecta_temperatura() {
        let clientes = amostra();
        let quentes = filtrar(&clientes, "", FiltroTemperatura::Apenas(Temperatura::Quente));
        assert_eq!(quentes.len(), 1);
        assert_eq!(quentes[0].nome, "Sítio Alegre");

        let nenhum = filtrar(
            &clientes,
            "fazenda",
            FiltroTemperatura::Apenas(Temperatura::Quente),
        );
        assert!(nenhum.is_empty());
    }

    #[test]
    fn test_filtro_temperatura_parse() {
        assert_eq!("Todas".parse::<FiltroTemperatura>().unwrap(), FiltroTemperatura::Todas);
        assert_eq!(
            "Quente".parse::<FiltroTemperatura>().unwrap(),
            FiltroTemperatura::Apenas(Temperatura::Quente)
        );
        assert!("Escaldante".parse::<FiltroTemperatura>().is_err());
    }

    #[test]
    fn test_stats_sobre_lista_completa() {
        let mut clientes = amostra();
        clientes[1].status = StatusPipeline::Faturamento;
        clientes[2].status = StatusPipeline::PedidoFaturado;
        let stats = DashboardStats::compute(&clientes);
        assert_eq!(stats.total_clientes, 3);
        assert_eq!(stats.valor_total, 300_000.0);
        assert_eq!(stats.clientes_quentes, 1);
        assert_eq!(stats.clientes_faturamento, 2);
    }

    #[test]
    fn test_form_novo_tem_defaults_do_original() {
        let form = ClienteFormView::novo();
        assert!(form.cliente_id.is_none());
        assert_eq!(form.draft.temperatura, Temperatura::Fria);
        assert_eq!(form.draft.status, StatusPipeline::InicioRelacionamento);
        assert_eq!(form.secao, Secao::Dados);
    }

    #[test]
    fn test_prepend_mantem_mais_recente_primeiro() {
        let mut form = ClienteFormView::novo();
        form.cliente_id = Some(1);
        let autor = usuario();
        form.prepend_evento(evento_local(10, "Visita técnica", &autor), &autor);
        form.prepend_evento(evento_local(11, "Ligação realizada", &autor), &autor);
        assert_eq!(form.historico[0].evento, "Ligação realizada");
        assert_eq!(form.historico[0].usuario_nome.as_deref(), Some("Carlos"));
        assert_eq!(form.historico[1].evento, "Visita técnica");
    }

    #[tokio::test]
    async fn test_delete_cancelado_nao_emite_requisicao() {
        // The client points at nothing; any issued request would error.
        let client = ApiClient::new("http://127.0.0.1:9/api", Some(1)).unwrap();
        let mut view = ClienteListView::new();
        let outcome = view.delete(&client, 1, || false).await.unwrap();
        assert_eq!(outcome, Confirmed::Cancelled);
    }

    #[tokio::test]
    async fn test_delete_confirmado_emite_requisicao() {
        let client = ApiClient::new("http://127.0.0.1:9/api", Some(1)).unwrap();
        let mut view = ClienteListView::new();
        // Confirmed delete reaches the gateway and surfaces its failure.
        assert!(view.delete(&client, 1, || true).await.is_err());
    }

    #[tokio::test]
    async fn test_load_failure_enters_failed_state() {
        let client = ApiClient::new("http://127.0.0.1:9/api", Some(1)).unwrap();
        let mut view = ClienteListView::new();
        assert!(view.load(&client).await.is_err());
        assert!(view.state().error().is_some());
        assert!(view.visiveis().is_empty());
    }
}
