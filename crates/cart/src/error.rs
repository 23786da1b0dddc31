//! Cart error types.

use session_store::StorageError;
use thiserror::Error;

use crate::value_objects::{Money, RawId};

/// Input rejected before any cart mutation took place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Quantity below 1 (or beyond what a row can hold).
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: i64 },

    /// Negative price.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Money },

    /// A numeric field received a value that is not a number.
    #[error("Invalid {field}: '{input}' is not numeric")]
    NotNumeric { field: &'static str, input: String },

    /// A row or cart total does not fit the money representation.
    #[error("Total overflows: {qty} x {price}")]
    TotalOverflow { price: Money, qty: u32 },

    /// An attribute name collides with a row field that cannot be set this way.
    #[error("Attribute '{key}' is reserved for the row field of the same name")]
    ReservedAttribute { key: String },

    /// The associated record type is not known to the registry.
    #[error("Invalid model name '{type_name}'")]
    UnknownType { type_name: String },
}

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Invalid input.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Update requested for a row that is not in the cart.
    #[error("Item not found: {raw_id}")]
    NotFound { raw_id: RawId },

    /// The session store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for cart operations.
pub type Result<T> = std::result::Result<T, CartError>;
