//! Session-scoped shopping cart engine.
//!
//! This crate provides:
//! - [`fingerprint`] for deterministic row identity from product id and attributes
//! - [`Cart`] with aggregates (row count, item count, total price) and search
//! - [`ShoppingCart`] implementing the row lifecycle (add, merge, update, remove,
//!   destroy) with lifecycle notifications through a [`CartEventDispatcher`]
//! - [`CartStore`] persisting the cart through a [`session_store::SessionStore`]

pub mod association;
pub mod cart;
pub mod config;
pub mod error;
pub mod events;
pub mod fingerprint;
pub mod row;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod value_objects;

pub use association::{KnownTypes, TypeRegistry};
pub use cart::Cart;
pub use common::SessionKey;
pub use config::{CartConfig, DEFAULT_CART_NAME};
pub use error::{CartError, Result, ValidationError};
pub use events::{
    AddData, BroadcastDispatcher, CartData, CartEvent, CartEventDispatcher, NullDispatcher,
    RecordingDispatcher, RowData, UpdatedData,
};
pub use fingerprint::fingerprint;
pub use row::{
    CartRow, ROW_FIELDS, RowPatch, validate_attributes, validate_price, validate_quantity,
};
pub use service::{CartUpdate, ShoppingCart};
pub use store::CartStore;
pub use telemetry::init_tracing;
pub use value_objects::{AttributeValue, Attributes, Money, ProductId, RawId};
