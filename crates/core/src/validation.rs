//! Bridge from `validator` derive output to [`CoreError::FieldErrors`].

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::{CoreError, FieldError};

/// Run `validator` rules on a request DTO.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::FieldErrors(flatten(&errors)))
}

/// Flatten field errors into `{path, msg}` pairs, sorted by path.
///
/// Nested structs and lists are walked, so an item error reads
/// `itens[0].largura`. Falls back to the rule code when a rule carries no
/// message.
pub fn flatten(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid ({})", e.code));
                    FieldError::new(path.clone(), msg)
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use validator::Validate;

    use super::*;
    use crate::client::validate_name;

    #[derive(Validate)]
    struct Contact {
        #[validate(custom(function = "validate_name"))]
        nome: String,
        #[validate(email(message = "O e-mail informado é inválido."))]
        email: String,
    }

    #[test]
    fn valid_input_passes() {
        let contact = Contact {
            nome: "Ana".into(),
            email: "ana@example.com".into(),
        };
        assert!(validate_input(&contact).is_ok());
    }

    #[test]
    fn errors_are_flattened_and_sorted() {
        let contact = Contact {
            nome: "Ana 2".into(),
            email: "not-an-email".into(),
        };
        let err = validate_input(&contact).unwrap_err();
        assert_matches!(err, CoreError::FieldErrors(ref fields) if fields.len() == 2);
        if let CoreError::FieldErrors(fields) = err {
            assert_eq!(fields[0].path, "email");
            assert_eq!(fields[0].msg, "O e-mail informado é inválido.");
            assert_eq!(fields[1].path, "nome");
        }
    }

    #[derive(serde::Serialize, Validate)]
    struct Line {
        #[validate(range(min = 0.01, message = "Largura deve ser maior que zero."))]
        largura: f64,
    }

    #[derive(Validate)]
    struct Order {
        #[validate(length(min = 1, message = "Informe ao menos um item."), nested)]
        itens: Vec<Line>,
    }

    #[test]
    fn nested_list_errors_carry_index_path() {
        let order = Order {
            itens: vec![Line { largura: 2.0 }, Line { largura: 0.0 }],
        };
        let err = validate_input(&order).unwrap_err();
        assert_matches!(err, CoreError::FieldErrors(ref fields) if fields.len() == 1);
        if let CoreError::FieldErrors(fields) = err {
            assert_eq!(fields[0].path, "itens[1].largura");
            assert_eq!(fields[0].msg, "Largura deve ser maior que zero.");
        }
    }

    #[test]
    fn empty_nested_list_reports_the_list_itself() {
        let err = validate_input(&Order { itens: vec![] }).unwrap_err();
        if let CoreError::FieldErrors(fields) = err {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].path, "itens");
        } else {
            panic!("expected field errors");
        }
    }
}
