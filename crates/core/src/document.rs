//! Tax-document normalization and check-digit validation.
//!
//! Individuals carry an 11-digit CPF, organizations a 14-digit CNPJ. Both are
//! stored digits-only; punctuation in the input (`529.982.247-25`,
//! `11.222.333/0001-81`) is stripped before validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// CPF length in digits.
pub const CPF_LEN: usize = 11;

/// CNPJ length in digits.
pub const CNPJ_LEN: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Whether a client is an individual or an organization.
///
/// Stored and serialized as `FISICA` / `JURIDICA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonType {
    #[serde(rename = "FISICA", alias = "INDIVIDUAL")]
    Individual,
    #[serde(rename = "JURIDICA", alias = "ORGANIZATION")]
    Organization,
}

impl PersonType {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonType::Individual => "FISICA",
            PersonType::Organization => "JURIDICA",
        }
    }

    /// Number of digits a valid document for this person type has.
    pub fn document_len(self) -> usize {
        match self {
            PersonType::Individual => CPF_LEN,
            PersonType::Organization => CNPJ_LEN,
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonType {
    type Err = CoreError;

    /// Case-insensitive; accepts the stored names and their English aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FISICA" | "INDIVIDUAL" => Ok(PersonType::Individual),
            "JURIDICA" | "ORGANIZATION" => Ok(PersonType::Organization),
            _ => Err(CoreError::Validation(
                "Person type must be 'FISICA' or 'JURIDICA'".to_string(),
            )),
        }
    }
}

/// Row decoding hook for `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for PersonType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Remove every non-digit character.
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize a raw document into canonical digits-only form.
///
/// Fails with [`CoreError::InvalidDocument`] when the digit count or check
/// digits do not match `person_type`.
pub fn normalize(raw: &str, person_type: PersonType) -> Result<String, CoreError> {
    let digits = strip_non_digits(raw);
    let valid = match person_type {
        PersonType::Individual => is_valid_cpf(&digits),
        PersonType::Organization => is_valid_cnpj(&digits),
    };

    if valid {
        Ok(digits)
    } else {
        let label = match person_type {
            PersonType::Individual => "CPF",
            PersonType::Organization => "CNPJ",
        };
        Err(CoreError::InvalidDocument(format!(
            "The {label} '{raw}' is invalid"
        )))
    }
}

/// Validate an 11-digit CPF (digits only).
pub fn is_valid_cpf(digits: &str) -> bool {
    let Some(d) = to_digits(digits, CPF_LEN) else {
        return false;
    };

    let first = check_digit(d[..9].iter().zip((2..=10).rev()));
    let second = check_digit(d[..10].iter().zip((2..=11).rev()));
    d[9] == first && d[10] == second
}

/// Validate a 14-digit CNPJ (digits only).
pub fn is_valid_cnpj(digits: &str) -> bool {
    let Some(d) = to_digits(digits, CNPJ_LEN) else {
        return false;
    };

    let first = check_digit(d[..12].iter().zip(CNPJ_FIRST_WEIGHTS));
    let second = check_digit(d[..13].iter().zip(CNPJ_SECOND_WEIGHTS));
    d[12] == first && d[13] == second
}

/// Parse `len` ASCII digits, rejecting repeated-digit sequences
/// (`00000000000`, `11111111111`, ...) which pass the arithmetic but are
/// never issued.
fn to_digits(s: &str, len: usize) -> Option<Vec<u32>> {
    if s.len() != len {
        return None;
    }
    let digits: Vec<u32> = s.chars().map(|c| c.to_digit(10)).collect::<Option<_>>()?;
    if digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    Some(digits)
}

/// Modulo-11 check digit over weighted digits.
fn check_digit<'a>(weighted: impl Iterator<Item = (&'a u32, u32)>) -> u32 {
    let sum: u32 = weighted.map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn valid_cpfs_pass() {
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("52998224725"));
        assert!(is_valid_cpf("12345678909"));
    }

    #[test]
    fn cpf_with_wrong_check_digit_fails() {
        assert!(!is_valid_cpf("11144477736"));
        assert!(!is_valid_cpf("52998224715"));
    }

    #[test]
    fn repeated_digits_fail() {
        assert!(!is_valid_cpf("00000000000"));
        assert!(!is_valid_cpf("99999999999"));
        assert!(!is_valid_cnpj("11111111111111"));
    }

    #[test]
    fn wrong_length_fails() {
        assert!(!is_valid_cpf("1114447773"));
        assert!(!is_valid_cnpj("1122233300018"));
    }

    #[test]
    fn valid_cnpjs_pass() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("11444777000161"));
    }

    #[test]
    fn cnpj_with_wrong_check_digit_fails() {
        assert!(!is_valid_cnpj("11222333000182"));
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(
            normalize("111.444.777-35", PersonType::Individual).unwrap(),
            "11144477735"
        );
        assert_eq!(
            normalize("11.222.333/0001-81", PersonType::Organization).unwrap(),
            "11222333000181"
        );
    }

    #[test]
    fn normalize_rejects_document_of_other_type() {
        assert_matches!(
            normalize("11144477735", PersonType::Organization),
            Err(CoreError::InvalidDocument(_))
        );
        assert_matches!(
            normalize("11222333000181", PersonType::Individual),
            Err(CoreError::InvalidDocument(_))
        );
    }

    #[test]
    fn person_type_parses_both_vocabularies() {
        assert_eq!("fisica".parse::<PersonType>().unwrap(), PersonType::Individual);
        assert_eq!(
            "ORGANIZATION".parse::<PersonType>().unwrap(),
            PersonType::Organization
        );
        assert!("EMPRESA".parse::<PersonType>().is_err());
    }

    #[test]
    fn person_type_serializes_stored_name() {
        let json = serde_json::to_value(PersonType::Organization).unwrap();
        assert_eq!(json, "JURIDICA");
        let parsed: PersonType = serde_json::from_value("INDIVIDUAL".into()).unwrap();
        assert_eq!(parsed, PersonType::Individual);
    }
}
