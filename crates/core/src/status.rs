//! Quote status gate.
//!
//! The nominal lifecycle is `PENDENTE -> APROVADO | REPROVADO -> EM PRODUCAO
//! -> CONCLUIDO -> ENTREGUE`, but any status may be set from any other; the
//! gate only checks membership in the fixed set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// List-filter sentinel meaning "any status".
pub const STATUS_FILTER_ALL: &str = "TODOS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteStatus {
    #[default]
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "APROVADO")]
    Approved,
    #[serde(rename = "REPROVADO")]
    Rejected,
    #[serde(rename = "EM PRODUCAO")]
    InProduction,
    #[serde(rename = "CONCLUIDO")]
    Done,
    #[serde(rename = "ENTREGUE")]
    Delivered,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 6] = [
        QuoteStatus::Pending,
        QuoteStatus::Approved,
        QuoteStatus::Rejected,
        QuoteStatus::InProduction,
        QuoteStatus::Done,
        QuoteStatus::Delivered,
    ];

    /// Stored value, as written to the `quotes.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Pending => "PENDENTE",
            QuoteStatus::Approved => "APROVADO",
            QuoteStatus::Rejected => "REPROVADO",
            QuoteStatus::InProduction => "EM PRODUCAO",
            QuoteStatus::Done => "CONCLUIDO",
            QuoteStatus::Delivered => "ENTREGUE",
        }
    }

    fn english_alias(self) -> &'static str {
        match self {
            QuoteStatus::Pending => "PENDING",
            QuoteStatus::Approved => "APPROVED",
            QuoteStatus::Rejected => "REJECTED",
            QuoteStatus::InProduction => "IN PRODUCTION",
            QuoteStatus::Done => "DONE",
            QuoteStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = CoreError;

    /// Uppercases the input and treats `_` as a space, so `"em producao"`,
    /// `"EM_PRODUCAO"` and `"IN_PRODUCTION"` all resolve to
    /// [`QuoteStatus::InProduction`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        QuoteStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == normalized || st.english_alias() == normalized)
            .ok_or_else(|| {
                CoreError::InvalidStatus(format!(
                    "'{}' is not one of: {}",
                    s.trim(),
                    QuoteStatus::ALL.map(QuoteStatus::as_str).join(", ")
                ))
            })
    }
}

/// Row decoding hook for `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for QuoteStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parse the optional `status` list filter.
///
/// Empty input and the `TODOS` / `ALL` sentinels mean "no status filter".
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<QuoteStatus>, CoreError> {
    match raw.map(normalize) {
        None => Ok(None),
        Some(s) if s.is_empty() || s == STATUS_FILTER_ALL || s == "ALL" => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

fn normalize(s: &str) -> String {
    s.trim()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn lowercase_with_space_normalizes() {
        assert_eq!(
            "em producao".parse::<QuoteStatus>().unwrap(),
            QuoteStatus::InProduction
        );
    }

    #[test]
    fn english_names_accepted() {
        assert_eq!(
            "IN_PRODUCTION".parse::<QuoteStatus>().unwrap(),
            QuoteStatus::InProduction
        );
        assert_eq!("delivered".parse::<QuoteStatus>().unwrap(), QuoteStatus::Delivered);
    }

    #[test]
    fn every_stored_value_round_trips() {
        for st in QuoteStatus::ALL {
            assert_eq!(st.as_str().parse::<QuoteStatus>().unwrap(), st);
        }
    }

    #[test]
    fn unknown_status_rejected() {
        assert_matches!("BOGUS".parse::<QuoteStatus>(), Err(CoreError::InvalidStatus(_)));
        assert_matches!("".parse::<QuoteStatus>(), Err(CoreError::InvalidStatus(_)));
    }

    #[test]
    fn filter_sentinels_mean_no_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("TODOS")).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
        assert_eq!(parse_status_filter(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("aprovado")).unwrap(),
            Some(QuoteStatus::Approved)
        );
    }

    #[test]
    fn default_is_pending() {
        assert_eq!(QuoteStatus::default(), QuoteStatus::Pending);
    }

    #[test]
    fn serializes_as_stored_value() {
        assert_eq!(
            serde_json::to_value(QuoteStatus::InProduction).unwrap(),
            "EM PRODUCAO"
        );
    }
}
