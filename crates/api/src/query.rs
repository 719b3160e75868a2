//! Shared query parameter types for list endpoints.
//!
//! Numeric parameters arrive as strings and are parsed leniently: the
//! browser sends empty values for untouched filter fields, and an empty or
//! unparsable value means "not set" rather than a rejected request.

use lonas_core::pagination::PageRequest;
use serde::Deserialize;

/// `?pagina=&limite=`.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub pagina: Option<String>,
    pub limite: Option<String>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(parse_int(self.pagina.as_deref()), parse_int(self.limite.as_deref()))
    }
}

/// `GET /clientes` parameters.
#[derive(Debug, Deserialize)]
pub struct ClientListParams {
    pub tipo: Option<String>,
    pub termo: Option<String>,
    /// Legacy name filter, used when `tipo`/`termo` are absent.
    pub nome: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

/// `GET /orcamentos` parameters.
#[derive(Debug, Deserialize)]
pub struct QuoteListParams {
    pub cliente_id: Option<String>,
    pub numero_orcamento: Option<String>,
    pub nome_cliente: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

/// Parse an optional integer parameter; blank or invalid means absent.
pub fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Trimmed, non-empty text parameter.
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_garbage_numbers_are_absent() {
        assert_eq!(parse_int(Some("")), None);
        assert_eq!(parse_int(Some("abc")), None);
        assert_eq!(parse_int(Some(" 3 ")), Some(3));
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn page_params_fall_back_to_defaults() {
        let params = PageParams {
            pagina: Some("".into()),
            limite: Some("500".into()),
        };
        let page = params.page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some("  ana ")), Some("ana".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
    }
}
