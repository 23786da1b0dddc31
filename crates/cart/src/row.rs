//! Cart rows and row patches.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::value_objects::{AttributeValue, Attributes, Money, ProductId, RawId};

/// Checks that a requested quantity is at least 1 and fits a row.
pub fn validate_quantity(quantity: i64) -> Result<u32, ValidationError> {
    match u32::try_from(quantity) {
        Ok(qty) if qty >= 1 => Ok(qty),
        _ => Err(ValidationError::InvalidQuantity { quantity }),
    }
}

/// Checks that a price is not negative.
pub fn validate_price(price: Money) -> Result<Money, ValidationError> {
    if price.is_negative() {
        return Err(ValidationError::InvalidPrice { price });
    }
    Ok(price)
}

/// Row fields. Attributes never take these names.
pub const ROW_FIELDS: [&str; 6] = ["raw_id", "id", "name", "qty", "price", "total"];

/// Checks that no attribute is named after a row field.
pub fn validate_attributes(attributes: &Attributes) -> Result<(), ValidationError> {
    match attributes.iter().find(|(key, _)| ROW_FIELDS.contains(key)) {
        Some((key, _)) => Err(ValidationError::ReservedAttribute {
            key: key.to_string(),
        }),
        None => Ok(()),
    }
}

fn line_total(price: Money, qty: u32) -> Result<Money, ValidationError> {
    price
        .checked_multiply(qty)
        .ok_or(ValidationError::TotalOverflow { price, qty })
}

/// One line item of a cart.
///
/// `total` is derived from `qty * price` whenever either changes, and a row
/// whose total would overflow is never built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartRow {
    raw_id: RawId,
    id: ProductId,
    name: String,
    qty: u32,
    price: Money,
    total: Money,
    #[serde(default)]
    attributes: Attributes,
}

impl CartRow {
    pub(crate) fn new(
        raw_id: RawId,
        id: ProductId,
        name: String,
        qty: u32,
        price: Money,
        attributes: Attributes,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            raw_id,
            id,
            name,
            qty,
            price,
            total: line_total(price, qty)?,
            attributes,
        })
    }

    pub fn raw_id(&self) -> &RawId {
        &self.raw_id
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qty(&self) -> u32 {
        self.qty
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Looks up a field or attribute by name.
    ///
    /// Row fields (`raw_id`, `id`, `name`, `qty`, `price`, `total`) shadow
    /// attributes of the same name. Prices are exposed as floats.
    pub fn field(&self, key: &str) -> Option<AttributeValue> {
        match key {
            "raw_id" => Some(AttributeValue::from(self.raw_id.as_str())),
            "id" => Some(AttributeValue::from(self.id.as_str())),
            "name" => Some(AttributeValue::from(self.name.as_str())),
            "qty" => Some(AttributeValue::from(self.qty)),
            "price" => Some(AttributeValue::Float(self.price.as_f64())),
            "total" => Some(AttributeValue::Float(self.total.as_f64())),
            _ => self.attributes.get(key).cloned(),
        }
    }

    /// Returns a copy holding `qty`, with the total re-derived.
    pub(crate) fn with_qty(&self, qty: u32) -> Result<CartRow, ValidationError> {
        Ok(CartRow {
            qty,
            total: line_total(self.price, qty)?,
            ..self.clone()
        })
    }

    /// Returns a copy with the patch applied. The row itself is untouched, so
    /// a rejected patch changes nothing.
    ///
    /// Patch attributes named `name`, `qty` or `price` set those fields, with
    /// the patch's own fields taking precedence. `raw_id`, `id` and `total`
    /// cannot be patched.
    pub(crate) fn patched(&self, patch: &RowPatch) -> Result<CartRow, ValidationError> {
        let mut name = None;
        let mut qty = None;
        let mut price = None;
        let mut attributes = self.attributes.clone();

        for (key, value) in patch.attributes.iter() {
            match key {
                "name" => name = Some(value.to_string()),
                "qty" => qty = Some(value.to_quantity()?),
                "price" => price = Some(value.to_money()?),
                "raw_id" | "id" | "total" => {
                    return Err(ValidationError::ReservedAttribute {
                        key: key.to_string(),
                    });
                }
                _ => {
                    attributes.insert(key, value.clone());
                }
            }
        }

        let qty = match patch.qty.or(qty) {
            Some(qty) => validate_quantity(qty)?,
            None => self.qty,
        };
        let price = match patch.price.or(price) {
            Some(price) => validate_price(price)?,
            None => self.price,
        };

        Ok(CartRow {
            raw_id: self.raw_id.clone(),
            id: self.id.clone(),
            name: patch.name.clone().or(name).unwrap_or_else(|| self.name.clone()),
            qty,
            price,
            total: line_total(price, qty)?,
            attributes,
        })
    }
}

/// Field and attribute changes applied to an existing row.
///
/// Attributes are merged into the row; the row keeps its raw id. Attributes
/// named `name`, `qty` or `price` are applied to those fields instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowPatch {
    pub name: Option<String>,
    pub qty: Option<i64>,
    pub price: Option<Money>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl RowPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn qty(mut self, qty: i64) -> Self {
        self.qty = Some(qty);
        self
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }
}
