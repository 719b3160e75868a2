//! Quote number allocation.
//!
//! Numbers are allocated inside the transaction that inserts the quote, so a
//! rolled-back create never consumes a number under the counter strategy.
//! The `uq_quotes_number` constraint backs both strategies: a collision
//! surfaces as [`WriteError::NumberConflict`] instead of a duplicate.

use std::fmt;
use std::str::FromStr;

use lonas_core::error::CoreError;
use lonas_core::quote::QuoteNumber;
use sqlx::{Postgres, Transaction};

use crate::error::WriteError;

/// Highest sequence already issued for a year, read from the quotes table.
const MAX_SEQUENCE_SQL: &str = "\
    SELECT MAX(split_part(number, '/', 1)::INTEGER) FROM quotes WHERE number LIKE $1";

/// Advance the per-year counter. The first use of a year seeds it from the
/// quotes already stored, so numbering never restarts below existing data.
const COUNTER_UPSERT_SQL: &str = "\
    INSERT INTO quote_number_sequences (year, last_value) \
    VALUES ($1, COALESCE((\
        SELECT MAX(split_part(number, '/', 1)::INTEGER) FROM quotes WHERE number LIKE $2\
    ), 0) + 1) \
    ON CONFLICT (year) DO UPDATE \
    SET last_value = quote_number_sequences.last_value + 1 \
    RETURNING last_value";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberingStrategy {
    /// Per-year counter row in `quote_number_sequences`, incremented with an
    /// upsert. The row lock serializes concurrent creators and numbers are
    /// never reissued, even after the highest quote is deleted.
    #[default]
    CounterTable,
    /// `MAX(existing) + 1` under a per-year advisory lock. Deleting the
    /// newest quote of a year frees its number for reuse.
    MaxScan,
}

impl NumberingStrategy {
    /// Reserve the next number for `year` within `tx`.
    pub async fn allocate(
        self,
        tx: &mut Transaction<'_, Postgres>,
        year: i32,
    ) -> Result<QuoteNumber, WriteError> {
        let pattern = QuoteNumber::year_pattern(year);
        match self {
            NumberingStrategy::CounterTable => {
                let sequence = sqlx::query_scalar::<_, i32>(COUNTER_UPSERT_SQL)
                    .bind(year)
                    .bind(&pattern)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(WriteError::persistence("advance quote number counter"))?;
                Ok(QuoteNumber::new(sequence, year))
            }
            NumberingStrategy::MaxScan => {
                sqlx::query("SELECT pg_advisory_xact_lock($1)")
                    .bind(i64::from(year))
                    .execute(&mut **tx)
                    .await
                    .map_err(WriteError::persistence("lock quote numbering"))?;
                let max = sqlx::query_scalar::<_, Option<i32>>(MAX_SEQUENCE_SQL)
                    .bind(&pattern)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(WriteError::persistence("scan quote numbers"))?;
                Ok(QuoteNumber::next_after(max, year))
            }
        }
    }
}

impl fmt::Display for NumberingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NumberingStrategy::CounterTable => "counter",
            NumberingStrategy::MaxScan => "scan",
        })
    }
}

impl FromStr for NumberingStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "counter" => Ok(NumberingStrategy::CounterTable),
            "scan" => Ok(NumberingStrategy::MaxScan),
            other => Err(CoreError::Validation(format!(
                "Unknown quote numbering strategy '{other}' (expected 'counter' or 'scan')"
            ))),
        }
    }
}
