//! Repository for the `clients` table.

use lonas_core::pagination::PageRequest;
use lonas_core::types::DbId;
use sqlx::PgPool;

use crate::filter::{bind_values, bind_values_scalar, like_pattern, BindValue, FilterBuilder};
use crate::models::client::{Client, ClientFilter, ClientInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, person_type, document, address, \
                       birth_date, created_at, updated_at";

/// Provides CRUD operations for clients.
///
/// Document uniqueness is checked by the caller through
/// [`ClientRepo::find_id_by_document`] so it can report which rule failed;
/// `uq_clients_document` still rejects a racing duplicate.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &PgPool, input: &ClientInput) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, email, phone, person_type, document, address, birth_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.person_type.as_str())
            .bind(&input.document)
            .bind(&input.address)
            .bind(input.birth_date)
            .fetch_one(pool)
            .await
    }

    /// Find a client by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// ID of the client holding `document`, ignoring `exclude_id`.
    pub async fn find_id_by_document(
        pool: &PgPool,
        document: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM clients WHERE document = $1 AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(document)
        .bind(exclude_id)
        .fetch_optional(pool)
        .await
    }

    /// One page of clients matching `filter`, ordered by name.
    pub async fn list(
        pool: &PgPool,
        filter: &ClientFilter,
        page: &PageRequest,
    ) -> Result<Vec<Client>, sqlx::Error> {
        let builder = build_client_filter(filter);
        let idx = builder.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM clients {} \
             ORDER BY name ASC, id ASC \
             LIMIT ${idx} OFFSET ${}",
            builder.where_clause(),
            idx + 1
        );
        bind_values(sqlx::query_as::<_, Client>(&query), builder.binds())
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count clients matching `filter` (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &ClientFilter) -> Result<i64, sqlx::Error> {
        let builder = build_client_filter(filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM clients {}",
            builder.where_clause()
        );
        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), builder.binds())
            .fetch_one(pool)
            .await
    }

    /// Replace every field of a client.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ClientInput,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = $2, email = $3, phone = $4, person_type = $5,
                document = $6, address = $7, birth_date = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.person_type.as_str())
            .bind(&input.document)
            .bind(&input.address)
            .bind(input.birth_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a client; its quotes and their items cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn build_client_filter(filter: &ClientFilter) -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    match filter {
        ClientFilter::None => {}
        ClientFilter::Name(term) => {
            builder.push("name ILIKE {}", BindValue::Text(like_pattern(term)));
        }
        ClientFilter::Document(digits) => {
            builder.push("document = {}", BindValue::Text(digits.clone()));
        }
        ClientFilter::Phone(digits) => {
            builder.push("phone LIKE {}", BindValue::Text(like_pattern(digits)));
        }
    }
    builder
}
