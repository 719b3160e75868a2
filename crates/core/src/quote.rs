//! Quote pricing and numbering rules.
//!
//! A line item is a priced rectangle: `value = width * length * unit_price`.
//! The quote total is the sum of its item values rounded to cents. Quote
//! numbers look like `0007/2026`: a per-year sequence, zero-padded to four
//! digits, then the four-digit year.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::DbId;

/// Smallest accepted width, length or unit price.
pub const MIN_MEASURE: f64 = 0.01;

/// Minimum rendered width of the sequence component of a quote number.
pub const SEQUENCE_WIDTH: usize = 4;

/// The three numeric inputs of a line item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measures {
    /// Meters.
    pub width: f64,
    /// Meters.
    pub length: f64,
    /// Price per square meter.
    pub unit_price: f64,
}

impl Measures {
    pub fn value(&self) -> f64 {
        self.width * self.length * self.unit_price
    }
}

/// Computed values for a full item list.
#[derive(Debug, Clone, PartialEq)]
pub struct Pricing {
    /// One value per input item, in input order.
    pub item_values: Vec<f64>,
    /// Sum of `item_values`, rounded to cents.
    pub total: f64,
}

/// Reject a missing or non-positive client reference before touching storage.
pub fn validate_client_id(client_id: DbId) -> Result<(), CoreError> {
    if client_id < 1 {
        return Err(CoreError::Validation(
            "cliente_id must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Validate every item and compute item values and the quote total.
///
/// Fails on an empty list or an unrepresentable total, or with
/// [`CoreError::InvalidLineItem`] naming the first offending item index and
/// field.
pub fn price_items(items: &[Measures]) -> Result<Pricing, CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation(
            "A quote must have at least one item".to_string(),
        ));
    }

    for (index, m) in items.iter().enumerate() {
        check_measure(index, "largura", m.width)?;
        check_measure(index, "comprimento", m.length)?;
        check_measure(index, "preco_m2", m.unit_price)?;
    }

    let item_values: Vec<f64> = items.iter().map(Measures::value).collect();
    if let Some(index) = item_values.iter().position(|v| !v.is_finite()) {
        return Err(CoreError::InvalidLineItem {
            index,
            field: "valor_item",
            reason: "is too large".to_string(),
        });
    }

    let total = round_currency(item_values.iter().sum());
    if !total.is_finite() {
        return Err(CoreError::Validation(
            "The quote total is too large".to_string(),
        ));
    }
    Ok(Pricing { item_values, total })
}

fn check_measure(index: usize, field: &'static str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::InvalidLineItem {
            index,
            field,
            reason: "must be a finite number".to_string(),
        });
    }
    if value < MIN_MEASURE {
        return Err(CoreError::InvalidLineItem {
            index,
            field,
            reason: format!("must be at least {MIN_MEASURE}"),
        });
    }
    Ok(())
}

/// Round a currency amount to two decimal places (half away from zero).
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Human-facing quote number: `{sequence:04}/{year}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuoteNumber {
    pub year: i32,
    pub sequence: i32,
}

impl QuoteNumber {
    pub fn new(sequence: i32, year: i32) -> Self {
        Self { year, sequence }
    }

    /// `LIKE` pattern matching every number issued in `year`.
    pub fn year_pattern(year: i32) -> String {
        format!("%/{year:04}")
    }

    /// The number that follows the highest one already issued this year.
    pub fn next_after(max_existing: Option<i32>, year: i32) -> Self {
        Self::new(max_existing.unwrap_or(0) + 1, year)
    }
}

impl fmt::Display for QuoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0width$}/{:04}",
            self.sequence,
            self.year,
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for QuoteNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("'{s}' is not a quote number (NNNN/YYYY)"));
        let (seq, year) = s.split_once('/').ok_or_else(invalid)?;
        if seq.len() < SEQUENCE_WIDTH || year.len() != 4 {
            return Err(invalid());
        }
        let sequence: i32 = seq.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        if sequence < 1 {
            return Err(invalid());
        }
        Ok(Self::new(sequence, year))
    }
}
