//! Response envelopes shared by list and action endpoints.

use lonas_core::pagination::PageRequest;
use serde::Serialize;

/// One page of a listing: `{ <items_key>: [...], total, pagina, limite }`.
///
/// The items key differs per resource, so each handler module wraps its rows
/// in a small struct with the right field name and flattens this one in.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub total: i64,
    #[serde(flatten)]
    pub page: PageRequest,
}
