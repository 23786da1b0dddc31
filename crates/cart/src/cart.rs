//! The cart collection with its aggregates and search.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::row::CartRow;
use crate::value_objects::{Attributes, Money, RawId};

/// Ordered keyed collection of rows for one session.
///
/// Rows keep insertion order. No two rows share a raw id, no row holds a
/// quantity below 1 and the sum of row totals fits in [`Money`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    rows: Vec<CartRow>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a row by raw id.
    pub fn get(&self, raw_id: &RawId) -> Option<&CartRow> {
        self.rows.iter().find(|row| row.raw_id() == raw_id)
    }

    pub(crate) fn get_mut(&mut self, raw_id: &RawId) -> Option<&mut CartRow> {
        self.rows.iter_mut().find(|row| row.raw_id() == raw_id)
    }

    pub fn contains(&self, raw_id: &RawId) -> bool {
        self.get(raw_id).is_some()
    }

    /// Inserts a row, replacing a row with the same raw id in place.
    pub(crate) fn put(&mut self, row: CartRow) {
        match self.get_mut(row.raw_id()) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    /// Removes and returns a row.
    pub(crate) fn forget(&mut self, raw_id: &RawId) -> Option<CartRow> {
        let index = self.rows.iter().position(|row| row.raw_id() == raw_id)?;
        Some(self.rows.remove(index))
    }

    /// Iterates rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartRow> {
        self.rows.iter()
    }

    /// Returns the raw ids in insertion order.
    pub fn raw_ids(&self) -> impl Iterator<Item = &RawId> {
        self.rows.iter().map(CartRow::raw_id)
    }

    /// Number of distinct lines.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u64 {
        self.rows.iter().map(|row| u64::from(row.qty())).sum()
    }

    /// Item count when `total_items` is true, row count otherwise.
    pub fn count(&self, total_items: bool) -> u64 {
        if total_items {
            self.item_count()
        } else {
            self.row_count() as u64
        }
    }

    /// True when the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Sum of `qty * price` across all lines.
    pub fn total_price(&self) -> Money {
        if self.rows.is_empty() {
            return Money::zero();
        }
        self.rows.iter().map(CartRow::total).sum()
    }

    /// Checks that the cart total still fits once `row` is put.
    pub(crate) fn check_total_with(&self, row: &CartRow) -> Result<(), ValidationError> {
        self.rows
            .iter()
            .filter(|other| other.raw_id() != row.raw_id())
            .try_fold(row.total(), |sum, other| sum.checked_add(other.total()))
            .map(|_| ())
            .ok_or(ValidationError::TotalOverflow {
                price: row.price(),
                qty: row.qty(),
            })
    }

    /// Rows matching at least one of the criteria.
    ///
    /// A row matches when any criteria key names a row field or attribute
    /// holding an equal value. Numbers compare by value, so `{price: 5}`
    /// matches a row priced 5.00. Empty criteria match nothing.
    pub fn search(&self, criteria: &Attributes) -> Cart {
        if criteria.is_empty() {
            return Cart::new();
        }

        let rows = self
            .rows
            .iter()
            .filter(|row| {
                criteria
                    .iter()
                    .any(|(key, wanted)| row.field(key).is_some_and(|v| v.loosely_eq(wanted)))
            })
            .cloned()
            .collect();
        Cart { rows }
    }

    /// Repairs a cart decoded from storage: totals are re-derived, and rows
    /// with a zero quantity, a repeated raw id or an overflowing total are
    /// dropped.
    pub(crate) fn normalized(self) -> Cart {
        let mut cart = Cart::new();
        for row in self.rows {
            if row.qty() == 0 || cart.contains(row.raw_id()) {
                continue;
            }
            let Ok(row) = row.with_qty(row.qty()) else {
                continue;
            };
            if cart.check_total_with(&row).is_ok() {
                cart.rows.push(row);
            }
        }
        cart
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartRow;
    type IntoIter = std::slice::Iter<'a, CartRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
