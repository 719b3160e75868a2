//! Client input rules.
//!
//! Used as `validator` custom functions on request DTOs, so each returns a
//! [`ValidationError`] whose message is shown to the end user.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

use crate::document::strip_non_digits;
use crate::types::{today, Date};

/// Letters (including Latin-1 accented ones), whitespace, `.`, `-` and `&`.
const NAME_PATTERN: &str = r"^[A-Za-zÀ-ÖØ-öø-ÿ\s.\-&]+$";

/// Digits, whitespace, parentheses and dashes.
const PHONE_PATTERN: &str = r"^[0-9\s()\-]+$";

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(NAME_PATTERN).expect("valid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(error("required", "O nome é um campo obrigatório."));
    }
    if !NAME_RE.is_match(name) {
        return Err(error("invalid_chars", "O nome contém caracteres inválidos."));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Err(error("required", "O telefone é obrigatório."));
    }
    if !PHONE_RE.is_match(phone) || strip_non_digits(phone).is_empty() {
        return Err(error(
            "invalid_phone",
            "O telefone deve conter apenas números, parênteses, traços e espaços.",
        ));
    }
    Ok(())
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Campo obrigatório."));
    }
    Ok(())
}

/// Birth or founding date must not lie in the future.
pub fn validate_birth_date(date: &Date) -> Result<(), ValidationError> {
    if *date > today() {
        return Err(error(
            "future_date",
            "A data de nascimento não pode ser uma data futura.",
        ));
    }
    Ok(())
}

/// Canonical stored phone: digits only.
pub fn normalize_phone(phone: &str) -> String {
    strip_non_digits(phone)
}

#[cfg(test)]
mod tests {
    use chrono::Days;

    use super::*;

    #[test]
    fn accented_names_accepted() {
        assert!(validate_name("Ana Silva").is_ok());
        assert!(validate_name("João & Filhos Ltda.").is_ok());
        assert!(validate_name("Márcia Conceição-Souza").is_ok());
    }

    #[test]
    fn names_with_digits_or_symbols_rejected() {
        assert!(validate_name("Ana 2").is_err());
        assert!(validate_name("Ana@Silva").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn phone_accepts_punctuated_numbers() {
        assert!(validate_phone("(11) 98765-4321").is_ok());
        assert!(validate_phone("11987654321").is_ok());
    }

    #[test]
    fn phone_rejects_letters_and_punctuation_only() {
        assert!(validate_phone("11-CALL-NOW").is_err());
        assert!(validate_phone("()-").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn normalize_phone_keeps_digits() {
        assert_eq!(normalize_phone("(11) 98765-4321"), "11987654321");
    }

    #[test]
    fn future_birth_date_rejected() {
        let now = today();
        assert!(validate_birth_date(&now).is_ok());
        let tomorrow = now.checked_add_days(Days::new(1)).unwrap();
        let err = validate_birth_date(&tomorrow).unwrap_err();
        assert_eq!(err.code, "future_date");
    }
}
