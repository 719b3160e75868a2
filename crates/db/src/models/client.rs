//! Client entity model, input DTO and list filter.

use lonas_core::document::{strip_non_digits, PersonType};
use lonas_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "tipo_pessoa")]
    #[sqlx(try_from = "String")]
    pub person_type: PersonType,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "endereco")]
    pub address: String,
    #[serde(rename = "data_nascimento")]
    pub birth_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated, normalized client fields for insert or full update.
///
/// `document` and `phone` must already be digits-only; the HTTP layer
/// builds this from the request after running the input rules.
#[derive(Debug, Clone)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub person_type: PersonType,
    pub document: String,
    pub address: String,
    pub birth_date: Date,
}

/// At most one search criterion for client listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClientFilter {
    #[default]
    None,
    /// Case-insensitive name substring.
    Name(String),
    /// Exact digits-only document.
    Document(String),
    /// Digits-only phone substring.
    Phone(String),
}

impl ClientFilter {
    /// Build from `?tipo=&termo=`, falling back to the legacy `?nome=`.
    ///
    /// An unknown `tipo` or a blank term means no filter.
    pub fn from_params(tipo: Option<&str>, termo: Option<&str>, legacy_name: Option<&str>) -> Self {
        let term = termo.map(str::trim).filter(|t| !t.is_empty());
        match (tipo.map(str::trim), term) {
            (Some(tipo), Some(term)) => match tipo.to_lowercase().as_str() {
                "nome" => ClientFilter::Name(term.to_string()),
                "documento" => ClientFilter::Document(strip_non_digits(term)),
                "telefone" => ClientFilter::Phone(strip_non_digits(term)),
                _ => ClientFilter::None,
            },
            _ => match legacy_name.map(str::trim).filter(|n| !n.is_empty()) {
                Some(name) => ClientFilter::Name(name.to_string()),
                None => ClientFilter::None,
            },
        }
    }
}
