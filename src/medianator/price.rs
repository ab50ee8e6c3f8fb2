//! Fixed-point oracle price
//!
//! Prices are carried as integer raw units scaled by 10^6. No floating point
//! is involved anywhere between the feed and the encoded call.

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{ORACLE_PRICE_DECIMALS, ORACLE_PRICE_DENOMINATOR};
use crate::error::{MedianatorError, Result};

/// Price with exactly `ORACLE_PRICE_DECIMALS` fractional digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OraclePrice {
    raw_units: i128,
}

impl OraclePrice {
    /// Wrap a value already expressed in raw units
    pub fn from_raw_price(raw_units: impl Into<i128>) -> Self {
        Self {
            raw_units: raw_units.into(),
        }
    }

    /// Raw units from an integer string, decimal or `0x`-prefixed hex
    pub fn from_raw_str(raw: &str) -> Result<Self> {
        let (digits, radix, negative) = match raw.strip_prefix('-') {
            Some(rest) => (rest, 10, true),
            None => match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
                Some(hex) => (hex, 16, false),
                None => (raw, 10, false),
            },
        };
        if digits.is_empty() || digits.starts_with(['+', '-']) {
            return Err(MedianatorError::parse(raw, "expected an integer in raw units"));
        }
        let magnitude = i128::from_str_radix(digits, radix)
            .map_err(|e| MedianatorError::parse(raw, format!("expected an integer in raw units: {}", e)))?;
        Ok(Self::from_raw_price(if negative { -magnitude } else { magnitude }))
    }

    /// Raw units from a loosely typed JSON value (number or integer string)
    pub fn from_raw_value(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(s) => Self::from_raw_str(s),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Ok(Self::from_raw_price(v))
                } else if let Some(v) = n.as_u64() {
                    Ok(Self::from_raw_price(v))
                } else {
                    Err(MedianatorError::parse(n.to_string(), "raw units must be an integer"))
                }
            }
            other => Err(MedianatorError::parse(
                other.to_string(),
                "raw units must be a number or an integer string",
            )),
        }
    }

    /// Parse a human decimal string such as `"101.5"`.
    ///
    /// Digits beyond the sixth fractional place are rejected unless they are
    /// trailing zeros, so the parsed value is always exact.
    pub fn parse_user_price(price: &str) -> Result<Self> {
        let unsigned = price.strip_prefix('-').unwrap_or(price);
        if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(MedianatorError::parse(price, "expected a decimal number"));
        }

        // Checked on the text: Decimal silently rounds past 28 fractional digits.
        let significant = unsigned
            .split_once('.')
            .map(|(_, fraction)| fraction.trim_end_matches('0').len())
            .unwrap_or(0);
        if significant > ORACLE_PRICE_DECIMALS as usize {
            return Err(MedianatorError::parse(
                price,
                format!(
                    "{} fractional digits exceed the supported {}",
                    significant, ORACLE_PRICE_DECIMALS
                ),
            ));
        }

        let value = Decimal::from_str(price)
            .map_err(|e| MedianatorError::parse(price, format!("expected a decimal number: {}", e)))?
            .normalize();

        let scale = value.scale();
        if scale > ORACLE_PRICE_DECIMALS {
            return Err(MedianatorError::parse(
                price,
                format!(
                    "{} fractional digits exceed the supported {}",
                    scale, ORACLE_PRICE_DECIMALS
                ),
            ));
        }

        let factor = 10i128.pow(ORACLE_PRICE_DECIMALS - scale);
        let raw_units = value
            .mantissa()
            .checked_mul(factor)
            .ok_or_else(|| MedianatorError::parse(price, "value out of range"))?;
        Ok(Self { raw_units })
    }

    pub fn raw_units(&self) -> i128 {
        self.raw_units
    }

    pub fn is_zero(&self) -> bool {
        self.raw_units == 0
    }

    /// `1 / price` in the same scale, truncated. Zero inverts to zero.
    pub fn invert(&self) -> Self {
        let raw_units = if self.raw_units == 0 {
            0
        } else {
            ORACLE_PRICE_DENOMINATOR * ORACLE_PRICE_DENOMINATOR / self.raw_units
        };
        Self { raw_units }
    }

    /// Decimal string with exactly six fractional digits, e.g. `"101.000000"`
    pub fn to_exact(&self) -> String {
        let denominator = ORACLE_PRICE_DENOMINATOR as u128;
        let abs = self.raw_units.unsigned_abs();
        format!(
            "{}{}.{:0width$}",
            if self.raw_units < 0 { "-" } else { "" },
            abs / denominator,
            abs % denominator,
            width = ORACLE_PRICE_DECIMALS as usize
        )
    }

    pub fn format(&self) -> String {
        self.to_exact()
    }

    pub fn to_decimal(&self) -> Result<Decimal> {
        Decimal::try_from_i128_with_scale(self.raw_units, ORACLE_PRICE_DECIMALS)
            .map_err(|e| MedianatorError::parse(self.raw_units.to_string(), e.to_string()))
    }
}

impl fmt::Display for OraclePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_exact())
    }
}

impl FromStr for OraclePrice {
    type Err = MedianatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_user_price(s)
    }
}

// Raw units travel as integer strings so they survive JSON number limits.
impl Serialize for OraclePrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw_units.to_string())
    }
}

impl<'de> Deserialize<'de> for OraclePrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_raw_value(&value).map_err(de::Error::custom)
    }
}
