use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single inventory record as it travels over the wire.
///
/// `Default` is the "empty" stock returned when a lookup matches no row:
/// `{ "id": 0, "name": "", "price": 0, "company": "" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Server-assigned primary key. Never changes once assigned.
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "price_from_number")]
    pub price: Decimal,
    pub company: String,
}

/// The body of a create or update request: a `Stock` without its id.
///
/// All three fields are required. Unknown fields (including a client-supplied
/// `id`) are ignored, so the server stays the only source of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStock {
    pub name: String,
    #[serde(deserialize_with = "price_from_number")]
    pub price: Decimal,
    pub company: String,
}

impl NewStock {
    /// Attaches an id, producing the full record.
    pub fn with_id(self, id: i64) -> Stock {
        Stock {
            id,
            name: self.name,
            price: self.price,
            company: self.company,
        }
    }
}

/// Response body for create, update and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub id: i64,
    pub message: String,
}

impl MutationResponse {
    pub fn created(id: i64) -> Self {
        Self {
            id,
            message: "stock created successfully".to_string(),
        }
    }

    pub fn updated(id: i64, rows_affected: u64) -> Self {
        Self {
            id,
            message: format!(
                "Stock updated successfully. Total rows/records affected {}",
                rows_affected
            ),
        }
    }

    pub fn deleted(id: i64, rows_affected: u64) -> Self {
        Self {
            id,
            message: format!(
                "Stock deleted successfully. Total rows/records affected {}",
                rows_affected
            ),
        }
    }
}

/// Reads a price that must be a JSON number; strings such as `"12.5"` are rejected.
fn price_from_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(PriceVisitor)
}

struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
        // Display gives the shortest text that round-trips, so 12.5 stays 12.5.
        Decimal::from_str(&value.to_string())
            .map_err(|_| E::invalid_value(Unexpected::Float(value), &self))
    }
}

/// Parses the `{id}` path segment into a stock id.
pub fn parse_stock_id(raw: &str) -> Result<i64, CoreError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| CoreError::InvalidInput("id".to_string(), format!("'{}' ({})", raw, e)))
}
