//! Repository for the `quotes` and `quote_items` tables.
//!
//! Create and update are multi-statement writes: each runs in one
//! transaction that is rolled back explicitly on any failure, so a reader
//! never sees a header without its items or a half-replaced item set.

use chrono::Datelike;
use lonas_core::error::CoreError;
use lonas_core::pagination::PageRequest;
use lonas_core::quote::{price_items, validate_client_id, Pricing, QuoteNumber};
use lonas_core::status::QuoteStatus;
use lonas_core::types::{Date, DbId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{is_constraint_error, WriteError, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::filter::{bind_values, bind_values_scalar, like_pattern, BindValue, FilterBuilder};
use crate::models::quote::{
    CreatedQuote, QuoteDetail, QuoteFilter, QuoteHeader, QuoteInput, QuoteItem, QuoteSummary,
    UpdatedQuote,
};
use crate::numbering::NumberingStrategy;

/// Header columns joined with the owning client's display fields.
const HEADER_SELECT: &str = "\
    SELECT q.id, q.number, q.client_id, q.description, q.total_value, q.issue_date, \
           q.delivery_deadline, q.status, q.created_at, q.updated_at, \
           c.name AS client_name, c.email AS client_email, c.phone AS client_phone, \
           c.document AS client_document, c.person_type AS client_person_type, \
           c.address AS client_address \
    FROM quotes q JOIN clients c ON c.id = q.client_id";

/// Listing columns.
const SUMMARY_COLUMNS: &str = "\
    q.id, q.number, q.description, q.total_value, q.issue_date, \
    q.delivery_deadline, q.status, c.name AS client_name";

/// Column list for `quote_items` SELECT queries.
const ITEM_COLUMNS: &str = "\
    id, quote_id, description, color, notes, material, width, length, unit_price, value";

/// Provides the quote persistence engine and queries.
pub struct QuoteRepo;

impl QuoteRepo {
    /// Validate, price, number and insert a quote with all its items.
    ///
    /// The number is allocated for the year of `issue_date`. Fails without
    /// touching storage when the input is invalid.
    pub async fn create(
        pool: &PgPool,
        input: &QuoteInput,
        issue_date: Date,
        numbering: NumberingStrategy,
    ) -> Result<CreatedQuote, WriteError> {
        let pricing = price_quote(input)?;

        let mut tx = pool
            .begin()
            .await
            .map_err(WriteError::persistence("begin quote transaction"))?;

        match insert_in_tx(&mut tx, input, &pricing, issue_date, numbering).await {
            Ok(created) => {
                tx.commit()
                    .await
                    .map_err(WriteError::persistence("commit quote"))?;
                tracing::info!(
                    quote_id = created.id,
                    number = %created.number,
                    client_id = input.client_id,
                    total = created.total_value,
                    "Quote created"
                );
                Ok(created)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e)
            }
        }
    }

    /// Replace the header fields and the whole item set of quote `id`.
    ///
    /// Number, issue date and status are left untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &QuoteInput,
    ) -> Result<UpdatedQuote, WriteError> {
        let pricing = price_quote(input)?;

        let mut tx = pool
            .begin()
            .await
            .map_err(WriteError::persistence("begin quote transaction"))?;

        match replace_in_tx(&mut tx, id, input, &pricing).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(WriteError::persistence("commit quote update"))?;
                tracing::info!(
                    quote_id = id,
                    items = input.items.len(),
                    total = pricing.total,
                    "Quote items replaced"
                );
                Ok(UpdatedQuote {
                    id,
                    total_value: pricing.total,
                })
            }
            Err(e) => {
                rollback(tx).await;
                Err(e)
            }
        }
    }

    /// Header, client fields and items (by ID ascending) of one quote.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<QuoteDetail>, sqlx::Error> {
        let query = format!("{HEADER_SELECT} WHERE q.id = $1");
        let Some(header) = sqlx::query_as::<_, QuoteHeader>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let items = Self::list_items(pool, id).await?;
        Ok(Some(QuoteDetail { header, items }))
    }

    /// Items of a quote in insertion order.
    pub async fn list_items(pool: &PgPool, quote_id: DbId) -> Result<Vec<QuoteItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM quote_items WHERE quote_id = $1 ORDER BY id");
        sqlx::query_as::<_, QuoteItem>(&query)
            .bind(quote_id)
            .fetch_all(pool)
            .await
    }

    /// One page of quotes matching `filter`, newest issue date first and
    /// newest ID first within a date.
    pub async fn list(
        pool: &PgPool,
        filter: &QuoteFilter,
        page: &PageRequest,
    ) -> Result<Vec<QuoteSummary>, sqlx::Error> {
        let builder = build_quote_filter(filter);
        let idx = builder.next_index();
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM quotes q JOIN clients c ON c.id = q.client_id {} \
             ORDER BY q.issue_date DESC, q.id DESC \
             LIMIT ${idx} OFFSET ${}",
            builder.where_clause(),
            idx + 1
        );
        bind_values(sqlx::query_as::<_, QuoteSummary>(&query), builder.binds())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count quotes matching `filter` (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &QuoteFilter) -> Result<i64, sqlx::Error> {
        let builder = build_quote_filter(filter);
        let query = format!(
            "SELECT COUNT(q.id)::BIGINT FROM quotes q JOIN clients c ON c.id = q.client_id {}",
            builder.where_clause()
        );
        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), builder.binds())
            .fetch_one(pool)
            .await
    }

    /// Set only the status column. Returns `true` if the quote exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: QuoteStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE quotes SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a quote; its items cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn price_quote(input: &QuoteInput) -> Result<Pricing, CoreError> {
    validate_client_id(input.client_id)?;
    price_items(&input.measures())
}

async fn insert_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    input: &QuoteInput,
    pricing: &Pricing,
    issue_date: Date,
    numbering: NumberingStrategy,
) -> Result<CreatedQuote, WriteError> {
    let number = numbering.allocate(tx, issue_date.year()).await?;

    let id = sqlx::query_scalar::<_, DbId>(
        "INSERT INTO quotes (number, client_id, description, total_value, issue_date, \
                             delivery_deadline, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(number.to_string())
    .bind(input.client_id)
    .bind(&input.description)
    .bind(pricing.total)
    .bind(issue_date)
    .bind(input.delivery_deadline)
    .bind(QuoteStatus::default().as_str())
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| classify_header_error(e, Some(&number), input.client_id))?;

    insert_items(tx, id, input, pricing).await?;

    Ok(CreatedQuote {
        id,
        number: number.to_string(),
        total_value: pricing.total,
    })
}

async fn replace_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
    input: &QuoteInput,
    pricing: &Pricing,
) -> Result<(), WriteError> {
    sqlx::query("DELETE FROM quote_items WHERE quote_id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(WriteError::persistence("delete quote items"))?;

    let result = sqlx::query(
        "UPDATE quotes SET client_id = $2, description = $3, total_value = $4, \
                           delivery_deadline = $5 \
         WHERE id = $1",
    )
    .bind(id)
    .bind(input.client_id)
    .bind(&input.description)
    .bind(pricing.total)
    .bind(input.delivery_deadline)
    .execute(&mut **tx)
    .await
    .map_err(|e| classify_header_error(e, None, input.client_id))?;

    if result.rows_affected() == 0 {
        return Err(CoreError::NotFound { entity: "Quote", id }.into());
    }

    insert_items(tx, id, input, pricing).await
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    quote_id: DbId,
    input: &QuoteInput,
    pricing: &Pricing,
) -> Result<(), WriteError> {
    for (item, value) in input.items.iter().zip(&pricing.item_values) {
        sqlx::query(
            "INSERT INTO quote_items (quote_id, description, color, notes, material, \
                                      width, length, unit_price, value) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(quote_id)
        .bind(&item.description)
        .bind(&item.color)
        .bind(&item.notes)
        .bind(&item.material)
        .bind(item.width)
        .bind(item.length)
        .bind(item.unit_price)
        .bind(*value)
        .execute(&mut **tx)
        .await
        .map_err(WriteError::persistence("insert quote item"))?;
    }
    Ok(())
}

fn classify_header_error(err: sqlx::Error, number: Option<&QuoteNumber>, client_id: DbId) -> WriteError {
    if let Some(number) = number {
        if is_constraint_error(&err, UNIQUE_VIOLATION, Some("uq_quotes_number")) {
            tracing::warn!(number = %number, "Quote number collision");
            return WriteError::NumberConflict(number.to_string());
        }
    }
    if is_constraint_error(&err, FOREIGN_KEY_VIOLATION, None) {
        return WriteError::UnknownClient(client_id);
    }
    WriteError::Persistence {
        context: "write quote header",
        source: err,
    }
}

async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Quote transaction rollback failed");
    }
}

fn build_quote_filter(filter: &QuoteFilter) -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    if let Some(client_id) = filter.client_id {
        builder.push("q.client_id = {}", BindValue::BigInt(client_id));
    }
    if let Some(number) = filter.number.as_deref() {
        builder.push("q.number ILIKE {}", BindValue::Text(like_pattern(number)));
    }
    if let Some(name) = filter.client_name.as_deref() {
        builder.push("c.name ILIKE {}", BindValue::Text(like_pattern(name)));
    }
    if let Some(status) = filter.status {
        builder.push("q.status = {}", BindValue::Text(status.as_str().to_string()));
    }
    builder
}
