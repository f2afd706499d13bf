//! Customer (cliente) wire models: the record itself, its negotiation
//! enums, interaction history events and photo metadata.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Negotiation heat. Serialized exactly as the backend stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Temperatura {
    Fria,
    Morna,
    Quente,
}

impl Temperatura {
    pub const ALL: [Temperatura; 3] = [Temperatura::Fria, Temperatura::Morna, Temperatura::Quente];

    pub fn as_str(&self) -> &'static str {
        match self {
            Temperatura::Fria => "Fria",
            Temperatura::Morna => "Morna",
            Temperatura::Quente => "Quente",
        }
    }
}

impl fmt::Display for Temperatura {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Temperatura {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fria" | "fria" => Ok(Temperatura::Fria),
            "Morna" | "morna" => Ok(Temperatura::Morna),
            "Quente" | "quente" => Ok(Temperatura::Quente),
            other => Err(format!("unknown temperature: {other}")),
        }
    }
}

/// Deal stage, from first contact to an invoiced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusPipeline {
    #[serde(rename = "Início de Relacionamento")]
    InicioRelacionamento,
    #[serde(rename = "Negociação")]
    Negociacao,
    Faturamento,
    #[serde(rename = "Pedido Faturado")]
    PedidoFaturado,
}

impl StatusPipeline {
    pub const ALL: [StatusPipeline; 4] = [
        StatusPipeline::InicioRelacionamento,
        StatusPipeline::Negociacao,
        StatusPipeline::Faturamento,
        StatusPipeline::PedidoFaturado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPipeline::InicioRelacionamento => "Início de Relacionamento",
            StatusPipeline::Negociacao => "Negociação",
            StatusPipeline::Faturamento => "Faturamento",
            StatusPipeline::PedidoFaturado => "Pedido Faturado",
        }
    }

    /// Stages counted as "in billing" on the dashboards.
    pub fn em_faturamento(&self) -> bool {
        matches!(self, StatusPipeline::Faturamento | StatusPipeline::PedidoFaturado)
    }
}

impl fmt::Display for StatusPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusPipeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Início de Relacionamento" => Ok(StatusPipeline::InicioRelacionamento),
            "Negociação" => Ok(StatusPipeline::Negociacao),
            "Faturamento" => Ok(StatusPipeline::Faturamento),
            "Pedido Faturado" => Ok(StatusPipeline::PedidoFaturado),
            other => Err(format!("unknown pipeline status: {other}")),
        }
    }
}

/// One interaction with a customer. Append-only: events are never edited,
/// only added or removed as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evento {
    pub id: i64,
    #[serde(default)]
    pub cliente_id: Option<i64>,
    pub evento: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub data: NaiveDateTime,
    #[serde(default)]
    pub usuario_id: Option<i64>,
    #[serde(default)]
    pub usuario_nome: Option<String>,
}

/// Photo metadata attached to a record. Uploads themselves happen outside
/// this client; the list is carried read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Foto {
    pub id: i64,
    pub cliente_id: i64,
    pub nome_arquivo: String,
    pub caminho: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub data_upload: Option<NaiveDateTime>,
    #[serde(default)]
    pub usuario_id: Option<i64>,
}

/// A full customer record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    pub id: i64,
    pub nome: String,
    pub telefone: String,
    pub cidade: String,
    #[serde(default)]
    pub fazenda: Option<String>,
    #[serde(default)]
    pub coordenadas: Option<String>,
    pub area: f64,
    pub maquinas: String,
    pub temperatura: Temperatura,
    #[serde(default)]
    pub valor: Option<f64>,
    #[serde(default)]
    pub oportunidades: Option<String>,
    #[serde(default)]
    pub pendencias: Option<String>,
    pub status: StatusPipeline,
    #[serde(default)]
    pub data_faturamento: Option<NaiveDate>,
    #[serde(default)]
    pub observacoes_faturamento: Option<String>,
    #[serde(default)]
    pub criado_em: Option<NaiveDateTime>,
    #[serde(default)]
    pub atualizado_em: Option<NaiveDateTime>,
    #[serde(default)]
    pub criado_por: Option<i64>,
    #[serde(default)]
    pub historico: Vec<Evento>,
    #[serde(default)]
    pub fotos: Vec<Foto>,
}

/// The editable portion of a record. One draft backs every section of the
/// form and is submitted whole on save.
#[derive(Debug, Clone, Serialize)]
pub struct ClienteDraft {
    pub nome: String,
    pub telefone: String,
    pub cidade: String,
    pub fazenda: Option<String>,
    pub coordenadas: Option<String>,
    pub area: f64,
    pub maquinas: String,
    pub temperatura: Temperatura,
    pub valor: Option<f64>,
    pub oportunidades: Option<String>,
    pub pendencias: Option<String>,
    pub status: StatusPipeline,
    pub data_faturamento: Option<NaiveDate>,
    pub observacoes_faturamento: Option<String>,
}

impl Default for ClienteDraft {
    fn default() -> Self {
        Self {
            nome: String::new(),
            telefone: String::new(),
            cidade: String::new(),
            fazenda: None,
            coordenadas: None,
            area: 0.0,
            maquinas: String::new(),
            temperatura: Temperatura::Fria,
            valor: None,
            oportunidades: None,
            pendencias: None,
            status: StatusPipeline::InicioRelacionamento,
            data_faturamento: None,
            observacoes_faturamento: None,
        }
    }
}

impl From<&Cliente> for ClienteDraft {
    fn from(c: &Cliente) -> Self {
        Self {
            nome: c.nome.clone(),
            telefone: c.telefone.clone(),
            cidade: c.cidade.clone(),
            fazenda: c.fazenda.clone(),
            coordenadas: c.coordenadas.clone(),
            area: c.area,
            maquinas: c.maquinas.clone(),
            temperatura: c.temperatura,
            valor: c.valor,
            oportunidades: c.oportunidades.clone(),
            pendencias: c.pendencias.clone(),
            status: c.status,
            data_faturamento: c.data_faturamento,
            observacoes_faturamento: c.observacoes_faturamento.clone(),
        }
    }
}

/// Payload for appending an interaction event.
#[derive(Debug, Serialize)]
pub struct NovoEvento {
    pub evento: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}
