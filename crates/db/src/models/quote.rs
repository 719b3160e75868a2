//! Quote header, line item and listing models.

use lonas_core::document::PersonType;
use lonas_core::quote::Measures;
use lonas_core::status::QuoteStatus;
use lonas_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quotes` table joined with its client's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuoteHeader {
    pub id: DbId,
    #[serde(rename = "numero_orcamento")]
    pub number: String,
    #[serde(rename = "cliente_id")]
    pub client_id: DbId,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor_total")]
    pub total_value: f64,
    #[serde(rename = "data_orcamento")]
    pub issue_date: Date,
    #[serde(rename = "prazo_entrega")]
    pub delivery_deadline: Option<Date>,
    #[sqlx(try_from = "String")]
    pub status: QuoteStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(rename = "nome_cliente")]
    pub client_name: String,
    #[serde(rename = "email_cliente")]
    pub client_email: String,
    #[serde(rename = "telefone_cliente")]
    pub client_phone: String,
    #[serde(rename = "cliente_documento")]
    pub client_document: String,
    #[serde(rename = "cliente_tipo_pessoa")]
    #[sqlx(try_from = "String")]
    pub client_person_type: PersonType,
    #[serde(rename = "cliente_endereco")]
    pub client_address: String,
}

/// A row from the `quote_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuoteItem {
    pub id: DbId,
    #[serde(rename = "orcamento_id")]
    pub quote_id: DbId,
    #[serde(rename = "descricao_item")]
    pub description: Option<String>,
    #[serde(rename = "cor")]
    pub color: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    pub material: Option<String>,
    #[serde(rename = "largura")]
    pub width: f64,
    #[serde(rename = "comprimento")]
    pub length: f64,
    #[serde(rename = "preco_m2")]
    pub unit_price: f64,
    #[serde(rename = "valor_item")]
    pub value: f64,
}

/// A quote with its client fields and ordered items.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub header: QuoteHeader,
    #[serde(rename = "itens")]
    pub items: Vec<QuoteItem>,
}

/// One row of a quote listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuoteSummary {
    pub id: DbId,
    #[serde(rename = "numero_orcamento")]
    pub number: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor_total")]
    pub total_value: f64,
    #[serde(rename = "data_orcamento")]
    pub issue_date: Date,
    #[serde(rename = "prazo_entrega")]
    pub delivery_deadline: Option<Date>,
    #[sqlx(try_from = "String")]
    pub status: QuoteStatus,
    #[serde(rename = "nome_cliente")]
    pub client_name: String,
}

/// Validated quote header and items, as stored on create and update.
#[derive(Debug, Clone)]
pub struct QuoteInput {
    pub client_id: DbId,
    pub description: Option<String>,
    pub delivery_deadline: Option<Date>,
    pub items: Vec<QuoteItemInput>,
}

impl QuoteInput {
    pub fn measures(&self) -> Vec<Measures> {
        self.items.iter().map(QuoteItemInput::measures).collect()
    }
}

/// One line item of a [`QuoteInput`].
#[derive(Debug, Clone)]
pub struct QuoteItemInput {
    pub description: Option<String>,
    pub color: Option<String>,
    pub notes: Option<String>,
    pub material: Option<String>,
    pub width: f64,
    pub length: f64,
    pub unit_price: f64,
}

impl QuoteItemInput {
    pub fn measures(&self) -> Measures {
        Measures {
            width: self.width,
            length: self.length,
            unit_price: self.unit_price,
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedQuote {
    pub id: DbId,
    #[serde(rename = "numero_orcamento")]
    pub number: String,
    #[serde(rename = "valor_total")]
    pub total_value: f64,
}

/// Result of a successful full-replace update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatedQuote {
    pub id: DbId,
    #[serde(rename = "valor_total")]
    pub total_value: f64,
}

/// AND-combined listing filter. `None` fields are inactive.
#[derive(Debug, Clone, Default)]
pub struct QuoteFilter {
    pub client_id: Option<DbId>,
    /// Substring of the quote number.
    pub number: Option<String>,
    /// Case-insensitive substring of the client name.
    pub client_name: Option<String>,
    pub status: Option<QuoteStatus>,
}
