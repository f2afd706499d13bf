//! CLI module for the AgroCRM terminal client.
//!
//! Subcommands mirror the route surface of the web front end:
//! - `login` / `logout` / `whoami` - session management
//! - `dashboard` - role-appropriate dashboard (seller or manager)
//! - `clientes ...` - customer record CRUD and local filtering
//! - `historico ...` - interaction history append/remove
//! - `usuarios ...` - user administration (managers only)
//! - `init-admin` - one-shot backend bootstrap

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::Config;
use crate::gateway::ApiClient;
use crate::models::{Cliente, Evento, Role, StatusPipeline, Temperatura, User};
use crate::router::{resolve, Resolution, Route, SessionState};
use crate::session::SessionStore;
use crate::views::{
    ClienteFormView, ClienteListView, Confirmed, DashboardStats, FiltroTemperatura, UserAdminView,
};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "agrocrm")]
#[command(author, version, about = "Terminal client for the AgroCRM backend", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "agrocrm.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (overrides the config file)
    #[arg(long, env = "AGROCRM_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token for this invocation only; the persisted session is
    /// left untouched (can also be set via AGROCRM_TOKEN)
    #[arg(long, env = "AGROCRM_TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate and persist the session credential
    Login {
        email: String,
        /// Password; prompted on stdin when omitted
        #[arg(long)]
        senha: Option<String>,
    },

    /// Clear the persisted session credential
    Logout,

    /// Show the authenticated identity
    Whoami,

    /// Render the dashboard for the session's role
    Dashboard,

    /// Customer record commands
    #[command(subcommand)]
    Clientes(ClientesCommands),

    /// Interaction history commands
    #[command(subcommand)]
    Historico(HistoricoCommands),

    /// User administration commands (managers only)
    #[command(subcommand)]
    Usuarios(UsuariosCommands),

    /// Create the default manager account on a fresh backend
    InitAdmin,
}

/// Customer subcommands
#[derive(Subcommand, Debug)]
pub enum ClientesCommands {
    /// List records, filtered locally
    List {
        /// Case-insensitive search over name and city
        #[arg(long, default_value = "")]
        busca: String,
        /// Temperature filter: Todas, Fria, Morna or Quente
        #[arg(long, default_value = "Todas")]
        temperatura: FiltroTemperatura,
    },
    /// Show one record in full
    Show { id: i64 },
    /// Create a record
    New {
        #[command(flatten)]
        campos: CamposCliente,
    },
    /// Edit a record; only the given fields change
    Edit {
        id: i64,
        #[command(flatten)]
        campos: EditaCliente,
    },
    /// Delete a record (asks for confirmation)
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Fields of a new record. Required ones match the backend's schema.
#[derive(Args, Debug)]
pub struct CamposCliente {
    #[arg(long)]
    pub nome: String,
    #[arg(long)]
    pub telefone: String,
    #[arg(long)]
    pub cidade: String,
    #[arg(long)]
    pub fazenda: Option<String>,
    #[arg(long)]
    pub coordenadas: Option<String>,
    /// Planted area in hectares
    #[arg(long)]
    pub area: f64,
    #[arg(long)]
    pub maquinas: String,
    #[arg(long, default_value = "Fria")]
    pub temperatura: Temperatura,
    /// Negotiation value in R$
    #[arg(long)]
    pub valor: Option<f64>,
    #[arg(long)]
    pub oportunidades: Option<String>,
    #[arg(long)]
    pub pendencias: Option<String>,
    #[arg(long, default_value = "Início de Relacionamento")]
    pub status: StatusPipeline,
    #[arg(long)]
    pub data_faturamento: Option<NaiveDate>,
    #[arg(long)]
    pub observacoes_faturamento: Option<String>,
}

/// Partial overrides applied on top of the stored record.
#[derive(Args, Debug)]
pub struct EditaCliente {
    #[arg(long)]
    pub nome: Option<String>,
    #[arg(long)]
    pub telefone: Option<String>,
    #[arg(long)]
    pub cidade: Option<String>,
    #[arg(long)]
    pub fazenda: Option<String>,
    #[arg(long)]
    pub coordenadas: Option<String>,
    #[arg(long)]
    pub area: Option<f64>,
    #[arg(long)]
    pub maquinas: Option<String>,
    #[arg(long)]
    pub temperatura: Option<Temperatura>,
    #[arg(long)]
    pub valor: Option<f64>,
    #[arg(long)]
    pub oportunidades: Option<String>,
    #[arg(long)]
    pub pendencias: Option<String>,
    #[arg(long)]
    pub status: Option<StatusPipeline>,
    #[arg(long)]
    pub data_faturamento: Option<NaiveDate>,
    #[arg(long)]
    pub observacoes_faturamento: Option<String>,
}

/// History subcommands
#[derive(Subcommand, Debug)]
pub enum HistoricoCommands {
    /// Append an event to a record's history
    Add {
        cliente_id: i64,
        /// Short description of the interaction
        evento: String,
        #[arg(long)]
        descricao: Option<String>,
    },
    /// Remove an event by id (asks for confirmation)
    Rm {
        cliente_id: i64,
        evento_id: i64,
        #[arg(long)]
        yes: bool,
    },
}

/// User administration subcommands
#[derive(Subcommand, Debug)]
pub enum UsuariosCommands {
    /// List accounts
    List,
    /// Create an account; every field including the password is required
    Add {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        senha: String,
        /// vendedor or gerente
        #[arg(long)]
        tipo: Role,
    },
    /// Edit an account; a blank --senha keeps the current password
    Edit {
        id: i64,
        #[arg(long)]
        nome: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        tipo: Option<Role>,
        #[arg(long, default_value = "")]
        senha: String,
    },
    /// Deactivate an account (asks for confirmation)
    Rm {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

// ============================================================================
// Command dispatch
// ============================================================================

/// A bootstrapped session: gateway plus the resolved session state.
struct Ctx {
    client: ApiClient,
    session: SessionState,
}

impl Ctx {
    /// Builds the gateway and resolves the session before anything
    /// renders, so no command ever acts on a half-settled state.
    async fn bootstrap(cli: &Cli, config: &Config) -> Result<Ctx> {
        let mut client = build_client(cli, config)?;
        let mut store = SessionStore::new(&config.storage.data_dir);
        let session = store.bootstrap(&mut client, cli.token.clone()).await?;
        Ok(Ctx { client, session })
    }

    /// The authenticated identity, or an instruction to log in.
    fn usuario(&self) -> Result<&User> {
        self.session
            .user()
            .context("Nenhuma sessão ativa. Use 'agrocrm login <email>' para entrar.")
    }
}

fn build_client(cli: &Cli, config: &Config) -> Result<ApiClient> {
    let base_url = cli.api_url.as_deref().unwrap_or(&config.api.base_url);
    ApiClient::new(base_url, Some(config.api.timeout_secs)).context("Failed to create HTTP client")
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Login { email, senha } => cmd_login(cli, config, email, senha.clone()).await,
        Commands::Logout => cmd_logout(cli, config),
        Commands::Whoami => cmd_whoami(cli, config).await,
        Commands::Dashboard => cmd_dashboard(cli, config).await,
        Commands::Clientes(cmd) => cmd_clientes(cli, config, cmd).await,
        Commands::Historico(cmd) => cmd_historico(cli, config, cmd).await,
        Commands::Usuarios(cmd) => cmd_usuarios(cli, config, cmd).await,
        Commands::InitAdmin => cmd_init_admin(cli, config).await,
    }
}

async fn cmd_login(cli: &Cli, config: &Config, email: &str, senha: Option<String>) -> Result<()> {
    let mut client = build_client(cli, config)?;
    let mut store = SessionStore::new(&config.storage.data_dir);

    let senha = match senha {
        Some(senha) => senha,
        None => prompt("Senha: ")?,
    };

    // Gateway errors surface unchanged: "Credenciais inválidas!" etc.
    let session = store.login(&mut client, email, &senha).await?;

    let user = session.user().context("login returned no identity")?;
    let home = session.home().context("login returned no home route")?;
    println!();
    println!("Bem-vindo, {}!", user.nome);
    println!("Perfil: {}", user.tipo);
    println!("Redirecionando para {home}");
    println!();
    Ok(())
}

fn cmd_logout(cli: &Cli, config: &Config) -> Result<()> {
    let mut client = build_client(cli, config)?;
    let mut store = SessionStore::new(&config.storage.data_dir);
    store.logout(&mut client);
    println!("Sessão encerrada.");
    Ok(())
}

async fn cmd_whoami(cli: &Cli, config: &Config) -> Result<()> {
    let ctx = Ctx::bootstrap(cli, config).await?;
    let user = ctx.usuario()?;
    let home = ctx.session.home().context("authenticated session has no home")?;
    println!();
    println!("Nome:   {}", user.nome);
    println!("Email:  {}", user.email);
    println!("Perfil: {}", user.tipo);
    println!("Painel: {home}");
    println!();
    Ok(())
}

async fn cmd_dashboard(cli: &Cli, config: &Config) -> Result<()> {
    let ctx = Ctx::bootstrap(cli, config).await?;
    ctx.usuario()?;
    match ctx.session.home() {
        Some(Route::Gerente) => render_gerente_dashboard(&ctx).await,
        Some(_) => render_vendedor_dashboard(&ctx).await,
        None => bail!("Nenhuma sessão ativa. Use 'agrocrm login <email>' para entrar."),
    }
}

async fn cmd_clientes(cli: &Cli, config: &Config, cmd: &ClientesCommands) -> Result<()> {
    let ctx = Ctx::bootstrap(cli, config).await?;

    // Every customer view hangs off the record form route.
    match resolve(&ctx.session, Route::Cliente(None)) {
        Resolution::Render(_) => {}
        _ => bail!("Nenhuma sessão ativa. Use 'agrocrm login <email>' para entrar."),
    }

    match cmd {
        ClientesCommands::List { busca, temperatura } => {
            let mut view = ClienteListView::new();
            view.load(&ctx.client).await?;
            view.busca = busca.clone();
            view.filtro = *temperatura;
            print_clientes_table(&view.visiveis());
            Ok(())
        }
        ClientesCommands::Show { id } => {
            let form = ClienteFormView::carregar(&ctx.client, *id).await?;
            print_cliente_detail(&form);
            Ok(())
        }
        ClientesCommands::New { campos } => {
            let mut form = ClienteFormView::novo();
            preencher_draft(&mut form, campos);
            let (salvo, volta) = form.salvar(&ctx.client, &ctx.session).await?;
            println!();
            println!("[OK] Cliente '{}' criado (id {}).", salvo.nome, salvo.id);
            println!("Voltando para {volta}");
            println!();
            Ok(())
        }
        ClientesCommands::Edit { id, campos } => {
            let mut form = ClienteFormView::carregar(&ctx.client, *id).await?;
            aplicar_edicao(&mut form, campos);
            let (salvo, volta) = form.salvar(&ctx.client, &ctx.session).await?;
            println!();
            println!("[OK] Cliente '{}' atualizado.", salvo.nome);
            println!("Voltando para {volta}");
            println!();
            Ok(())
        }
        ClientesCommands::Delete { id, yes } => {
            let mut view = ClienteListView::new();
            let outcome = view
                .delete(&ctx.client, *id, || {
                    confirm("Tem certeza que deseja excluir este cliente?", *yes)
                })
                .await?;
            match outcome {
                Confirmed::Deleted => {
                    println!("[OK] Cliente excluído.");
                    print_clientes_table(&view.visiveis());
                }
                Confirmed::Cancelled => println!("Exclusão cancelada."),
            }
            Ok(())
        }
    }
}

fn preencher_draft(form: &mut ClienteFormView, campos: &CamposCliente) {
    let draft = &mut form.draft;
    draft.nome = campos.nome.clone();
    draft.telefone = campos.telefone.clone();
    draft.cidade = campos.cidade.clone();
    draft.fazenda = campos.fazenda.clone();
    draft.coordenadas = campos.coordenadas.clone();
    draft.area = campos.area;
    draft.maquinas = campos.maquinas.clone();
    draft.temperatura = campos.temperatura;
    draft.valor = campos.valor;
    draft.oportunidades = campos.oportunidades.clone();
    draft.pendencias = campos.pendencias.clone();
    draft.status = campos.status;
    draft.data_faturamento = campos.data_faturamento;
    draft.observacoes_faturamento = campos.observacoes_faturamento.clone();
}

fn aplicar_edicao(form: &mut ClienteFormView, campos: &EditaCliente) {
    let draft = &mut form.draft;
    if let Some(nome) = &campos.nome {
        draft.nome = nome.clone();
    }
    if let Some(telefone) = &campos.telefone {
        draft.telefone = telefone.clone();
    }
    if let Some(cidade) = &campos.cidade {
        draft.cidade = cidade.clone();
    }
    if let Some(fazenda) = &campos.fazenda {
        draft.fazenda = Some(fazenda.clone());
    }
    if let Some(coordenadas) = &campos.coordenadas {
        draft.coordenadas = Some(coordenadas.clone());
    }
    if let Some(area) = campos.area {
        draft.area = area;
    }
    if let Some(maquinas) = &campos.maquinas {
        draft.maquinas = maquinas.clone();
    }
    if let Some(temperatura) = campos.temperatura {
        draft.temperatura = temperatura;
    }
    if let Some(valor) = campos.valor {
        draft.valor = Some(valor);
    }
    if let Some(oportunidades) = &campos.oportunidades {
        draft.oportunidades = Some(oportunidades.clone());
    }
    if let Some(pendencias) = &campos.pendencias {
        draft.pendencias = Some(pendencias.clone());
    }
    if let Some(status) = campos.status {
        draft.status = status;
    }
    if let Some(data) = campos.data_faturamento {
        draft.data_faturamento = Some(data);
    }
    if let Some(obs) = &campos.observacoes_faturamento {
        draft.observacoes_faturamento = Some(obs.clone());
    }
}

async fn cmd_historico(cli: &Cli, config: &Config, cmd: &HistoricoCommands) -> Result<()> {
    let ctx = Ctx::bootstrap(cli, config).await?;
    let usuario = ctx.usuario()?.clone();

    match cmd {
        HistoricoCommands::Add {
            cliente_id,
            evento,
            descricao,
        } => {
            let mut form = ClienteFormView::carregar(&ctx.client, *cliente_id).await?;
            form.adicionar_evento(&ctx.client, &usuario, evento, descricao.clone())
                .await?;
            println!();
            println!("[OK] Evento registrado.");
            print_historico(&form.historico);
            Ok(())
        }
        HistoricoCommands::Rm {
            cliente_id,
            evento_id,
            yes,
        } => {
            let mut form = ClienteFormView::carregar(&ctx.client, *cliente_id).await?;
            let outcome = form
                .remover_evento(&ctx.client, *evento_id, || {
                    confirm("Tem certeza que deseja remover este evento?", *yes)
                })
                .await?;
            match outcome {
                Confirmed::Deleted => {
                    println!("[OK] Evento removido.");
                    print_historico(&form.historico);
                }
                Confirmed::Cancelled => println!("Remoção cancelada."),
            }
            Ok(())
        }
    }
}

async fn cmd_usuarios(cli: &Cli, config: &Config, cmd: &UsuariosCommands) -> Result<()> {
    let ctx = Ctx::bootstrap(cli, config).await?;
    ctx.usuario()?;

    // User administration lives on the manager dashboard; everyone else
    // is sent back to their own home instead of getting an error page.
    match resolve(&ctx.session, Route::Gerente) {
        Resolution::Render(_) => {}
        Resolution::RedirectToLogin | Resolution::Pending => {
            bail!("Nenhuma sessão ativa. Use 'agrocrm login <email>' para entrar.")
        }
        Resolution::RedirectHome(home) => {
            println!("Acesso restrito a gerentes. Redirecionando para {home}");
            println!();
            return render_vendedor_dashboard(&ctx).await;
        }
    }

    let mut view = UserAdminView::new();
    match cmd {
        UsuariosCommands::List => {
            view.load(&ctx.client).await?;
            print_usuarios_table(view.usuarios());
            Ok(())
        }
        UsuariosCommands::Add {
            nome,
            email,
            senha,
            tipo,
        } => {
            let message = view
                .create(&ctx.client, nome.clone(), email.clone(), senha.clone(), *tipo)
                .await?;
            println!("[OK] {message}");
            print_usuarios_table(view.usuarios());
            Ok(())
        }
        UsuariosCommands::Edit {
            id,
            nome,
            email,
            tipo,
            senha,
        } => {
            view.load(&ctx.client).await?;
            let atual = view
                .usuarios()
                .iter()
                .find(|u| u.id == *id)
                .with_context(|| format!("Usuário {id} não encontrado"))?
                .clone();

            let message = view
                .update(
                    &ctx.client,
                    *id,
                    nome.clone().unwrap_or(atual.nome),
                    email.clone().unwrap_or(atual.email),
                    tipo.unwrap_or(atual.tipo),
                    senha,
                )
                .await?;
            println!("[OK] {message}");
            print_usuarios_table(view.usuarios());
            Ok(())
        }
        UsuariosCommands::Rm { id, yes } => {
            let outcome = view
                .deactivate(&ctx.client, *id, || {
                    confirm("Tem certeza que deseja desativar este usuário?", *yes)
                })
                .await?;
            match outcome {
                Confirmed::Deleted => {
                    println!("[OK] Usuário desativado.");
                    print_usuarios_table(view.usuarios());
                }
                Confirmed::Cancelled => println!("Desativação cancelada."),
            }
            Ok(())
        }
    }
}

async fn cmd_init_admin(cli: &Cli, config: &Config) -> Result<()> {
    let client = build_client(cli, config)?;
    let response = client.init_admin().await?;
    println!();
    println!("{}", response.message);
    if let (Some(email), Some(senha)) = (&response.email, &response.senha) {
        println!("Email: {email}");
        println!("Senha: {senha}");
    }
    println!();
    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

async fn render_vendedor_dashboard(ctx: &Ctx) -> Result<()> {
    let user = ctx.usuario()?;
    let mut view = ClienteListView::new();
    view.load(&ctx.client).await?;

    println!();
    println!("=== Painel do Vendedor: {} ===", user.nome);
    println!();
    print_stats(&view.stats());
    println!();
    print_clientes_table(&view.visiveis());
    Ok(())
}

async fn render_gerente_dashboard(ctx: &Ctx) -> Result<()> {
    let user = ctx.usuario()?;
    let mut clientes = ClienteListView::new();
    clientes.load(&ctx.client).await?;

    println!();
    println!("=== Painel do Gerente: {} ===", user.nome);
    println!();
    print_stats(&clientes.stats());
    println!();
    print_clientes_table(&clientes.visiveis());

    // The manager dashboard embeds user administration.
    let mut usuarios = UserAdminView::new();
    usuarios.load(&ctx.client).await?;
    println!("--- Usuários do Sistema ---");
    print_usuarios_table(usuarios.usuarios());
    Ok(())
}

fn print_stats(stats: &DashboardStats) {
    println!("Clientes:            {}", stats.total_clientes);
    println!("Valor em negociação: {}", format_valor(Some(stats.valor_total)));
    println!("Negociações quentes: {}", stats.clientes_quentes);
    println!("Em faturamento:      {}", stats.clientes_faturamento);
}

fn print_clientes_table(clientes: &[&Cliente]) {
    if clientes.is_empty() {
        println!("Nenhum cliente encontrado.");
        return;
    }

    println!(
        "{:<6}  {:<24}  {:<16}  {:<12}  {:<14}  {:<24}",
        "ID", "NOME", "CIDADE", "TEMPERATURA", "ÁREA", "STATUS"
    );
    println!("{}", "-".repeat(104));

    for cliente in clientes {
        println!(
            "{:<6}  {:<24}  {:<16}  {:<12}  {:<14}  {:<24}",
            cliente.id,
            truncate(&cliente.nome, 24),
            truncate(&cliente.cidade, 16),
            cliente.temperatura,
            format_area(cliente.area),
            cliente.status,
        );
    }
    println!();
}

fn print_cliente_detail(form: &ClienteFormView) {
    let d = &form.draft;
    println!();
    println!("=== Cliente: {} ===", d.nome);
    println!();
    println!("Dados do Cliente:");
    println!("  Telefone:      {}", d.telefone);
    println!("  Cidade:        {}", d.cidade);
    println!("  Fazenda:       {}", d.fazenda.as_deref().unwrap_or("-"));
    println!("  Coordenadas:   {}", d.coordenadas.as_deref().unwrap_or("-"));
    println!("  Área:          {}", format_area(d.area));
    println!("  Máquinas:      {}", d.maquinas);
    println!();
    println!("Negociação:");
    println!("  Temperatura:   {}", d.temperatura);
    println!("  Valor:         {}", format_valor(d.valor));
    println!("  Oportunidades: {}", d.oportunidades.as_deref().unwrap_or("-"));
    println!("  Pendências:    {}", d.pendencias.as_deref().unwrap_or("-"));
    println!();
    println!("Faturamento:");
    println!("  Status:        {}", d.status);
    println!(
        "  Data prevista: {}",
        d.data_faturamento
            .map(|data| data.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  Observações:   {}",
        d.observacoes_faturamento.as_deref().unwrap_or("-")
    );
    println!();
    println!("Histórico:");
    print_historico(&form.historico);
}

fn print_historico(historico: &[Evento]) {
    if historico.is_empty() {
        println!("  Nenhuma interação registrada.");
        println!();
        return;
    }
    for evento in historico {
        let autor = evento.usuario_nome.as_deref().unwrap_or("-");
        println!(
            "  [{}] {}  {}  (por: {})",
            evento.id,
            evento.data.format("%d/%m/%Y %H:%M"),
            evento.evento,
            autor
        );
        if let Some(descricao) = &evento.descricao {
            println!("        {descricao}");
        }
    }
    println!();
}

fn print_usuarios_table(usuarios: &[User]) {
    if usuarios.is_empty() {
        println!("Nenhum usuário cadastrado.");
        return;
    }

    println!(
        "{:<6}  {:<24}  {:<28}  {:<10}  {:<6}",
        "ID", "NOME", "EMAIL", "PERFIL", "ATIVO"
    );
    println!("{}", "-".repeat(82));

    for usuario in usuarios {
        println!(
            "{:<6}  {:<24}  {:<28}  {:<10}  {:<6}",
            usuario.id,
            truncate(&usuario.nome, 24),
            truncate(&usuario.email, 28),
            usuario.tipo,
            if usuario.ativo { "sim" } else { "não" },
        );
    }
    println!();
}

// ============================================================================
// Prompt and format helpers
// ============================================================================

/// Asks before a destructive action; `--yes` short-circuits the prompt.
fn confirm(question: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    print!("{question} (s/N) ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "s" | "sim")
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut value = String::new();
    io::stdin()
        .lock()
        .read_line(&mut value)
        .context("Failed to read from stdin")?;
    Ok(value.trim_end_matches(['\r', '\n']).to_string())
}

fn format_area(area: f64) -> String {
    if area.fract() == 0.0 {
        format!("{} hectares", area as i64)
    } else {
        format!("{area:.1} hectares")
    }
}

fn format_valor(valor: Option<f64>) -> String {
    match valor {
        Some(valor) => format!("R$ {valor:.2}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_area_whole_and_fractional() {
        assert_eq!(format_area(500.0), "500 hectares");
        assert_eq!(format_area(1200.5), "1200.5 hectares");
    }

    #[test]
    fn test_format_valor() {
        assert_eq!(format_valor(Some(850000.0)), "R$ 850000.00");
        assert_eq!(format_valor(None), "-");
    }

    #[test]
    fn test_truncate_handles_multibyte() {
        assert_eq!(truncate("Negociação", 24), "Negociação");
        assert_eq!(truncate("Fazenda Santa Esperança do Sul", 12), "Fazenda S...");
    }

    #[test]
    fn test_cli_parses_list_filters() {
        let cli = Cli::try_parse_from([
            "agrocrm",
            "clientes",
            "list",
            "--busca",
            "rio verde",
            "--temperatura",
            "Quente",
        ])
        .unwrap();
        match cli.command {
            Commands::Clientes(ClientesCommands::List { busca, temperatura }) => {
                assert_eq!(busca, "rio verde");
                assert_eq!(temperatura, FiltroTemperatura::Apenas(Temperatura::Quente));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_new_cliente_with_defaults() {
        let cli = Cli::try_parse_from([
            "agrocrm",
            "clientes",
            "new",
            "--nome",
            "Fazenda Teste",
            "--telefone",
            "(62) 90000-0000",
            "--cidade",
            "Rio Verde",
            "--area",
            "500",
            "--maquinas",
            "1 trator",
        ])
        .unwrap();
        match cli.command {
            Commands::Clientes(ClientesCommands::New { campos }) => {
                assert_eq!(campos.nome, "Fazenda Teste");
                assert_eq!(campos.area, 500.0);
                assert_eq!(campos.temperatura, Temperatura::Fria);
                assert_eq!(campos.status, StatusPipeline::InicioRelacionamento);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_all_fields_for_new_user() {
        let result = Cli::try_parse_from([
            "agrocrm", "usuarios", "add", "--nome", "Ana", "--email", "ana@agrocrm.com",
        ]);
        assert!(result.is_err());
    }
}
