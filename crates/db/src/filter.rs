//! Dynamic `WHERE` clause building for listing queries.
//!
//! Listing endpoints combine optional filters. Each active filter adds one
//! condition with a numbered placeholder; the collected bind values are then
//! applied in order to both the page query and its count query.

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    Text(String),
}

/// Accumulates `AND`-joined conditions and their bind values.
#[derive(Debug, Default)]
pub struct FilterBuilder {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition. `template` must contain exactly one `{}` which is
    /// replaced by the placeholder of `value`.
    pub fn push(&mut self, template: &str, value: BindValue) -> &mut Self {
        let placeholder = format!("${}", self.binds.len() + 1);
        self.conditions.push(template.replacen("{}", &placeholder, 1));
        self.binds.push(value);
        self
    }

    /// `WHERE a AND b ...`, or an empty string when no filter is active.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Index of the next free placeholder, for trailing `LIMIT` / `OFFSET`.
    pub fn next_index(&self) -> usize {
        self.binds.len() + 1
    }

    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
pub fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// `%term%` for `ILIKE`, with `\`, `%` and `_` in the term escaped so they
/// match literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
