//! Numeric values that may arrive as JSON text.
//!
//! Clients send `quantityOnHand` as `"454"` or `454`, and `price` as `12.99`
//! or `"12.99"`. Parsing happens during validation/reconciliation so a bad
//! value is reported as a `DomainError::Validation`, not a JSON rejection.
//!
//! serde_json is built with `arbitrary_precision`, so a JSON number keeps its
//! literal text and prices are parsed from that text, never through `f64`.

use core::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

use taproom_core::{DomainError, DomainResult};

/// Raw numeric input: either a JSON number or a string that should hold one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NumericText {
    Number(Number),
    Text(String),
}

impl NumericText {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Parse as a non-negative whole quantity.
    pub fn to_quantity(&self, field: &str) -> DomainResult<i32> {
        let parsed = match self {
            Self::Text(s) => s.trim().parse::<i64>().ok(),
            Self::Number(n) => n.as_i64(),
        };

        let value = parsed
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| DomainError::validation(format!("{field}: '{self}' is not a whole number")))?;

        if value < 0 {
            return Err(DomainError::validation(format!("{field}: must not be negative")));
        }
        Ok(value)
    }

    /// Parse as a monetary amount with at most two fractional digits.
    pub fn to_price(&self, field: &str) -> DomainResult<Price> {
        let parsed = match self {
            Self::Text(s) => s.parse::<Price>(),
            Self::Number(n) => Price::try_from(n),
        };
        parsed.map_err(|e| match e {
            DomainError::Validation(msg) => DomainError::validation(format!("{field}: {msg}")),
            other => other,
        })
    }
}

impl<'de> Deserialize<'de> for NumericText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::Text(s)),
            other => Err(de::Error::custom(format!(
                "expected a number or numeric string, got {other}"
            ))),
        }
    }
}

impl core::fmt::Display for NumericText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Number(n) => core::fmt::Display::fmt(n, f),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Non-negative money amount held in minor units (cents).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub fn from_minor_units(minor: i64) -> DomainResult<Self> {
        if minor < 0 {
            return Err(DomainError::validation("price must not be negative"));
        }
        Ok(Self(minor))
    }

    /// Infallible constructor for literal amounts.
    pub const fn from_cents(cents: u32) -> Self {
        Self(cents as i64)
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// JSON number form used in responses, e.g. `12.99`.
    pub fn to_json_number(&self) -> Option<Number> {
        self.to_string().parse().ok()
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(frac) {
            return Err(DomainError::validation(format!("'{s}' is not a valid amount")));
        }
        if frac.len() > 2 {
            return Err(DomainError::validation(format!(
                "'{s}' has more than two decimal places"
            )));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| DomainError::validation(format!("'{s}' is out of range")))?;
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().unwrap_or(0) * 10,
            _ => frac.parse::<i64>().unwrap_or(0),
        };

        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .ok_or_else(|| DomainError::validation(format!("'{s}' is out of range")))
            .and_then(Price::from_minor_units)
    }
}

impl TryFrom<&Number> for Price {
    type Error = DomainError;

    fn try_from(n: &Number) -> Result<Self, Self::Error> {
        n.to_string().parse()
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.to_json_number() {
            Some(n) => n.serialize(serializer),
            None => serializer.serialize_str(&self.to_string()),
        }
    }
}
