//! Technical-sheet record consumed by the layout engine
//!
//! The record arrives fully resolved from the record store. Serde accepts both
//! the English camelCase names and the store's Portuguese field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RendererResult;

fn default_sheet_version() -> String {
    "v1.0".to_string()
}

/// Treat present-but-blank strings like missing ones
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// One row of the circuit table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitRow {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "disjuntor")]
    pub breaker: String,
    #[serde(alias = "bitolaCabo")]
    pub cable_gauge: String,
    #[serde(default, alias = "observacoes")]
    pub notes: Option<String>,
}

impl CircuitRow {
    pub fn new(name: impl Into<String>, breaker: impl Into<String>, cable_gauge: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            breaker: breaker.into(),
            cable_gauge: cable_gauge.into(),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn notes(&self) -> Option<&str> {
        non_blank(&self.notes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSheetRecord {
    #[serde(default, alias = "logotipoEmpresaUrl")]
    pub company_logo_ref: Option<String>,
    #[serde(default, alias = "nomeEmpresa")]
    pub company_name: Option<String>,

    #[serde(alias = "titulo")]
    pub title: String,
    #[serde(alias = "localizacao")]
    pub location_label: String,
    #[serde(alias = "dataInstalacao")]
    pub installation_date: DateTime<Utc>,
    #[serde(alias = "responsavelTecnico")]
    pub technical_responsible: String,
    #[serde(default = "default_sheet_version", alias = "versaoFicha")]
    pub sheet_version: String,

    /// Display order; the printed circuit number is index + 1
    #[serde(default, alias = "circuitos")]
    pub circuits: Vec<CircuitRow>,

    #[serde(default, alias = "normaReferencia")]
    pub reference_standard_note: Option<String>,
    #[serde(default, alias = "drInstalado")]
    pub residual_device_installed: bool,
    #[serde(default, alias = "descricaoDROpcional")]
    pub residual_device_extra_note: Option<String>,

    #[serde(default, alias = "textoAcessoPublico")]
    pub public_access_text: Option<String>,
    #[serde(default, alias = "linkFichaPublica")]
    pub public_sheet_link: Option<String>,

    #[serde(alias = "nomeEletricista")]
    pub electrician_name: String,
    #[serde(default, alias = "assinaturaEletricistaUrl")]
    pub electrician_signature_ref: Option<String>,
    #[serde(alias = "contatoEletricista")]
    pub electrician_contact: String,
    #[serde(default, alias = "ramalPortaria")]
    pub gatehouse_extension: Option<String>,

    /// Only feeds the footer stamp
    pub created_at: DateTime<Utc>,
}

impl TechnicalSheetRecord {
    pub fn from_json_str(json: &str) -> RendererResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn company_logo_ref(&self) -> Option<&str> {
        non_blank(&self.company_logo_ref)
    }

    pub fn company_name(&self) -> Option<&str> {
        non_blank(&self.company_name)
    }

    pub fn reference_standard_note(&self) -> Option<&str> {
        non_blank(&self.reference_standard_note)
    }

    pub fn residual_device_extra_note(&self) -> Option<&str> {
        non_blank(&self.residual_device_extra_note)
    }

    pub fn public_access_text(&self) -> Option<&str> {
        non_blank(&self.public_access_text)
    }

    pub fn public_sheet_link(&self) -> Option<&str> {
        non_blank(&self.public_sheet_link)
    }

    pub fn electrician_signature_ref(&self) -> Option<&str> {
        non_blank(&self.electrician_signature_ref)
    }

    pub fn gatehouse_extension(&self) -> Option<&str> {
        non_blank(&self.gatehouse_extension)
    }
}
