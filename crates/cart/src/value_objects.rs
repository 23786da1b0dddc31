//! Value objects for the cart domain.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Deterministic fingerprint identifying one (product, attribute set) line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawId(String);

impl RawId {
    /// Wraps an already computed fingerprint.
    pub fn new(raw_id: impl Into<String>) -> Self {
        Self(raw_id.into())
    }

    /// Returns the fingerprint as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RawId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for RawId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Caller-supplied product identifier (SKU or numeric id).
///
/// Not unique within a cart: the same product with different attributes
/// becomes separate rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 999 = 9.99)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from a whole unit value.
    ///
    /// Saturates at the bounds of the cent representation.
    pub fn from_units(units: i64) -> Self {
        Self {
            cents: units.saturating_mul(100),
        }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the whole unit portion.
    pub fn units(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after units).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity, or None on overflow.
    pub fn checked_multiply(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts, or None on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.cents.checked_add(other.cents).map(Money::from_cents)
    }

    /// Returns the amount as a floating point value, for loose comparisons only.
    pub fn as_f64(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", self.units().abs(), self.cents_part())
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    /// Parses decimal strings such as `"9.99"`, `"5"` or `"7.5"`.
    ///
    /// At most two fractional digits are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let not_numeric = || ValidationError::NotNumeric {
            field: "price",
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) || fraction.len() > 2 {
            return Err(not_numeric());
        }

        let units: i64 = whole.parse().map_err(|_| not_numeric())?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| not_numeric())? * 10,
            _ => fraction.parse().map_err(|_| not_numeric())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(not_numeric)?;
        Ok(Money::from_cents(if negative { -total } else { total }))
    }
}

// Plain addition saturates; use `checked_add` where overflow must be reported.
impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// A scalar attribute value attached to a cart row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Writes an unambiguous byte encoding of the value, used for fingerprints.
    pub(crate) fn write_canonical(&self, out: &mut Vec<u8>) {
        match self {
            AttributeValue::Bool(b) => {
                out.push(b'b');
                out.push(u8::from(*b));
            }
            AttributeValue::Integer(i) => {
                out.push(b'i');
                out.extend_from_slice(&i.to_be_bytes());
            }
            AttributeValue::Float(f) => {
                out.push(b'f');
                out.extend_from_slice(&f.to_bits().to_be_bytes());
            }
            AttributeValue::Text(s) => {
                out.push(b's');
                out.extend_from_slice(&(s.len() as u64).to_be_bytes());
                out.extend_from_slice(s.as_bytes());
            }
        }
    }
}

impl AttributeValue {
    /// Numeric reading of the value. Text is parsed; booleans are never numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            AttributeValue::Bool(_) => None,
        }
    }

    /// Loose equality: numbers compare by value, so `5`, `5.0` and `"5"` are
    /// equal. Two text values still compare as strings.
    pub fn loosely_eq(&self, other: &AttributeValue) -> bool {
        if self == other {
            return true;
        }
        if matches!((self, other), (AttributeValue::Text(_), AttributeValue::Text(_))) {
            return false;
        }
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Reads the value as a price.
    pub fn to_money(&self) -> Result<Money, ValidationError> {
        let not_numeric = || ValidationError::NotNumeric {
            field: "price",
            input: self.to_string(),
        };

        match self {
            AttributeValue::Integer(units) => units
                .checked_mul(100)
                .map(Money::from_cents)
                .ok_or_else(not_numeric),
            AttributeValue::Float(f) => {
                let cents = (f * 100.0).round();
                if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
                    Ok(Money::from_cents(cents as i64))
                } else {
                    Err(not_numeric())
                }
            }
            AttributeValue::Text(s) => s.parse(),
            AttributeValue::Bool(_) => Err(not_numeric()),
        }
    }

    /// Reads the value as a whole quantity.
    pub fn to_quantity(&self) -> Result<i64, ValidationError> {
        let not_numeric = || ValidationError::NotNumeric {
            field: "qty",
            input: self.to_string(),
        };

        match self {
            AttributeValue::Integer(i) => Ok(*i),
            AttributeValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Ok(*f as i64)
            }
            AttributeValue::Text(s) => s.trim().parse().map_err(|_| not_numeric()),
            _ => Err(not_numeric()),
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x}"),
            AttributeValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i64::from(i))
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<u32> for AttributeValue {
    fn from(i: u32) -> Self {
        AttributeValue::Integer(i64::from(i))
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

/// Attribute set of a cart row, always kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttributeValue>);

impl Attributes {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces an attribute, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// Overwrites this set with every entry of `other`.
    pub fn merge(&mut self, other: &Attributes) {
        for (key, value) in other.iter() {
            self.0.insert(key.to_string(), value.clone());
        }
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Attributes
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_conversions() {
        let id = ProductId::new("SKU-001");
        assert_eq!(id.as_str(), "SKU-001");

        let numeric: ProductId = 42u64.into();
        assert_eq!(numeric.as_str(), "42");
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(1998).to_string(), "19.98");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-12.34");
        assert_eq!(Money::from_units(7).to_string(), "7.00");
    }

    #[test]
    fn test_money_parse() {
        assert_eq!("9.99".parse::<Money>().unwrap(), Money::from_cents(999));
        assert_eq!("7.5".parse::<Money>().unwrap(), Money::from_cents(750));
        assert_eq!("5".parse::<Money>().unwrap(), Money::from_cents(500));
        assert_eq!(" 0.00 ".parse::<Money>().unwrap(), Money::zero());
        assert_eq!("-1.25".parse::<Money>().unwrap(), Money::from_cents(-125));
    }

    #[test]
    fn test_money_parse_rejects_non_numeric() {
        for input in ["", "abc", "1.2.3", "9.999", ".5", "1,50", "--1"] {
            let err = input.parse::<Money>().unwrap_err();
            assert!(
                matches!(err, ValidationError::NotNumeric { field: "price", .. }),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_money_multiply_and_sum() {
        let price = Money::from_cents(999);
        assert_eq!(price.checked_multiply(5), Some(Money::from_cents(4995)));

        let total: Money = [Money::from_cents(100), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 350);
    }

    #[test]
    fn test_attributes_sorted_regardless_of_insert_order() {
        let a = Attributes::new().with("size", "L").with("color", "red");
        let b = Attributes::new().with("color", "red").with("size", "L");
        assert_eq!(a, b);

        let keys: Vec<_> = a.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["color", "size"]);
    }

    #[test]
    fn test_attributes_merge_overwrites() {
        let mut attrs = Attributes::from([("color", "red"), ("size", "M")]);
        attrs.merge(&Attributes::new().with("size", "L").with("gift", true));

        assert_eq!(attrs.get("size"), Some(&AttributeValue::from("L")));
        assert_eq!(attrs.get("gift"), Some(&AttributeValue::Bool(true)));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_attribute_value_untagged_serialization() {
        let attrs = Attributes::new()
            .with("color", "red")
            .with("size", 42)
            .with("weight", 1.5)
            .with("gift", false);

        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(
            json,
            r#"{"color":"red","gift":false,"size":42,"weight":1.5}"#
        );

        let back: Attributes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attrs);
    }

    #[test]
    fn test_money_checked_arithmetic_reports_overflow() {
        let big = Money::from_cents(i64::MAX / 2);
        assert_eq!(big.checked_multiply(3), None);
        assert_eq!(big.checked_add(big).map(|m| m.cents()), Some(i64::MAX - 1));
        assert_eq!(big.checked_add(Money::from_cents(i64::MAX)), None);
        assert_eq!(Money::from_units(i64::MAX).cents(), i64::MAX);

        let total: Money = [Money::from_cents(i64::MAX), Money::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_attribute_value_loose_equality() {
        let five = AttributeValue::Integer(5);
        assert!(five.loosely_eq(&AttributeValue::Float(5.0)));
        assert!(AttributeValue::Float(9.99).loosely_eq(&AttributeValue::from("9.99")));
        assert!(AttributeValue::Float(2.0).loosely_eq(&AttributeValue::Integer(2)));
        assert!(!five.loosely_eq(&AttributeValue::Float(5.5)));
        assert!(!AttributeValue::from("5").loosely_eq(&AttributeValue::from("5.0")));
        assert!(!AttributeValue::Bool(true).loosely_eq(&AttributeValue::Integer(1)));
    }

    #[test]
    fn test_attribute_value_numeric_readings() {
        assert_eq!(AttributeValue::Float(7.5).to_money(), Ok(Money::from_cents(750)));
        assert_eq!(AttributeValue::Integer(3).to_money(), Ok(Money::from_cents(300)));
        assert_eq!(AttributeValue::from("1.25").to_money(), Ok(Money::from_cents(125)));
        assert!(AttributeValue::Bool(true).to_money().is_err());
        assert!(AttributeValue::Float(f64::INFINITY).to_money().is_err());

        assert_eq!(AttributeValue::Integer(4).to_quantity(), Ok(4));
        assert_eq!(AttributeValue::Float(2.0).to_quantity(), Ok(2));
        assert_eq!(AttributeValue::from(" 6 ").to_quantity(), Ok(6));
        assert!(matches!(
            AttributeValue::Float(2.5).to_quantity(),
            Err(ValidationError::NotNumeric { field: "qty", .. })
        ));
    }
}
