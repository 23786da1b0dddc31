//! Shopping cart service: row lifecycle, aggregates and search for one session.

use std::sync::Arc;

use common::SessionKey;
use session_store::SessionStore;

use crate::association::{KnownTypes, TypeRegistry};
use crate::cart::Cart;
use crate::config::CartConfig;
use crate::error::{CartError, Result, ValidationError};
use crate::events::{CartEvent, CartEventDispatcher};
use crate::fingerprint::fingerprint;
use crate::row::{CartRow, RowPatch, validate_attributes, validate_price, validate_quantity};
use crate::store::CartStore;
use crate::value_objects::{Attributes, Money, ProductId, RawId};

/// Change requested by [`ShoppingCart::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum CartUpdate {
    /// New absolute quantity. Zero or less removes the row.
    Quantity(i64),

    /// Field and attribute patch.
    Patch(RowPatch),
}

impl From<i64> for CartUpdate {
    fn from(qty: i64) -> Self {
        CartUpdate::Quantity(qty)
    }
}

impl From<i32> for CartUpdate {
    fn from(qty: i32) -> Self {
        CartUpdate::Quantity(i64::from(qty))
    }
}

impl From<RowPatch> for CartUpdate {
    fn from(patch: RowPatch) -> Self {
        CartUpdate::Patch(patch)
    }
}

/// Session-scoped shopping cart.
///
/// Every mutation loads the cart, changes at most one row, emits lifecycle
/// events and saves the cart back before returning. Concurrent mutations of
/// the same session are last-writer-wins.
pub struct ShoppingCart<S: SessionStore, D: CartEventDispatcher> {
    store: CartStore<S>,
    events: D,
    types: Arc<dyn TypeRegistry>,
    model: Option<String>,
}

impl<S: SessionStore, D: CartEventDispatcher> std::fmt::Debug for ShoppingCart<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShoppingCart")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl<S: SessionStore, D: CartEventDispatcher> ShoppingCart<S, D> {
    /// Creates a cart for the session under the default name.
    pub fn new(store: S, session: SessionKey, events: D) -> Self {
        Self {
            store: CartStore::new(store, session),
            events,
            types: Arc::new(KnownTypes::default()),
            model: None,
        }
    }

    /// Creates a cart named according to the configuration.
    pub fn from_config(store: S, session: SessionKey, events: D, config: &CartConfig) -> Self {
        let mut cart = Self::new(store, session, events);
        cart.store.set_name(config.session_name.clone());
        cart
    }

    /// Sets the registry consulted by [`associate`](Self::associate).
    pub fn with_type_registry(mut self, registry: impl TypeRegistry + 'static) -> Self {
        self.types = Arc::new(registry);
        self
    }

    /// Overrides the name the cart is stored under.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.store.set_name(name);
        self
    }

    pub fn get_name(&self) -> &str {
        self.store.name()
    }

    pub fn session(&self) -> &SessionKey {
        self.store.session()
    }

    /// Returns a reference to the cart store.
    pub fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Associates the cart with a record type known to the registry.
    pub fn associate(&mut self, type_name: impl Into<String>) -> Result<&mut Self> {
        let type_name = type_name.into();
        if !self.types.exists(&type_name) {
            return Err(ValidationError::UnknownType { type_name }.into());
        }
        self.model = Some(type_name);
        Ok(self)
    }

    /// Returns the associated record type, if any.
    pub fn get_model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the whole cart.
    pub async fn all(&self) -> Result<Cart> {
        self.store.load().await
    }

    /// Returns a row, or None if it is not in the cart.
    pub async fn get(&self, raw_id: &RawId) -> Result<Option<CartRow>> {
        Ok(self.store.load().await?.get(raw_id).cloned())
    }

    /// Adds a row, or bumps the quantity of the row with the same product id
    /// and attributes.
    #[tracing::instrument(skip(self, id, name, attributes), fields(session = %self.session()))]
    pub async fn add(
        &self,
        id: impl Into<ProductId>,
        name: impl Into<String>,
        qty: i64,
        price: Money,
        attributes: Attributes,
    ) -> Result<CartRow> {
        let id = id.into();
        let name = name.into();
        let mut cart = self.store.load().await?;

        self.events.emit(CartEvent::adding(self.session(), &attributes, &cart));

        let row = self
            .add_row(&mut cart, id, name, qty, price, attributes.clone())
            .await?;

        self.events.emit(CartEvent::added(self.session(), &attributes, &cart));

        Ok(row)
    }

    /// Updates a row's quantity or applies a patch.
    ///
    /// Returns the updated row, or None when a quantity of zero or less
    /// removed it.
    #[tracing::instrument(skip(self, update), fields(session = %self.session()))]
    pub async fn update(
        &self,
        raw_id: &RawId,
        update: impl Into<CartUpdate>,
    ) -> Result<Option<CartRow>> {
        let update = update.into();
        let mut cart = self.store.load().await?;
        let row = cart.get(raw_id).cloned().ok_or_else(|| CartError::NotFound {
            raw_id: raw_id.clone(),
        })?;

        self.events.emit(CartEvent::updating(self.session(), &row, &cart));

        let updated = match update {
            CartUpdate::Quantity(qty) => self.update_qty(&mut cart, raw_id, qty).await?,
            CartUpdate::Patch(patch) => {
                Some(self.update_attribute(&mut cart, raw_id, &patch).await?)
            }
        };

        self.events.emit(CartEvent::updated(self.session(), updated.as_ref(), &cart));
        metrics::counter!("cart_rows_updated").increment(1);

        Ok(updated)
    }

    /// Removes a row. Removing a row that is not in the cart succeeds without
    /// effect.
    #[tracing::instrument(skip(self), fields(session = %self.session()))]
    pub async fn remove(&self, raw_id: &RawId) -> Result<()> {
        let mut cart = self.store.load().await?;
        self.remove_row(&mut cart, raw_id).await
    }

    /// Clears the cart for this session.
    #[tracing::instrument(skip(self), fields(session = %self.session()))]
    pub async fn destroy(&self) -> Result<()> {
        let cart = self.store.load().await?;

        self.events.emit(CartEvent::destroying(self.session(), &cart));

        self.store.clear().await?;

        self.events.emit(CartEvent::destroyed(self.session(), &cart));
        metrics::counter!("cart_destroyed").increment(1);
        tracing::debug!(rows = cart.row_count(), "cart destroyed");

        Ok(())
    }

    /// Alias for [`destroy`](Self::destroy).
    pub async fn clean(&self) -> Result<()> {
        self.destroy().await
    }

    /// Sum of `qty * price` across all rows.
    pub async fn total_price(&self) -> Result<Money> {
        Ok(self.store.load().await?.total_price())
    }

    /// Alias for [`total_price`](Self::total_price).
    pub async fn total(&self) -> Result<Money> {
        self.total_price().await
    }

    /// Item count when `total_items` is true, row count otherwise.
    pub async fn count(&self, total_items: bool) -> Result<u64> {
        Ok(self.store.load().await?.count(total_items))
    }

    /// Sum of quantities across all rows.
    pub async fn item_count(&self) -> Result<u64> {
        Ok(self.store.load().await?.item_count())
    }

    /// Number of distinct rows.
    pub async fn row_count(&self) -> Result<usize> {
        Ok(self.store.load().await?.row_count())
    }

    /// Alias for [`row_count`](Self::row_count).
    pub async fn count_rows(&self) -> Result<usize> {
        self.row_count().await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.store.load().await?.is_empty())
    }

    /// Rows matching at least one criterion, keyed by raw id in cart order.
    pub async fn search(&self, criteria: &Attributes) -> Result<Cart> {
        Ok(self.store.load().await?.search(criteria))
    }
}

// Row operations on a loaded cart
impl<S: SessionStore, D: CartEventDispatcher> ShoppingCart<S, D> {
    async fn add_row(
        &self,
        cart: &mut Cart,
        id: ProductId,
        name: String,
        qty: i64,
        price: Money,
        attributes: Attributes,
    ) -> Result<CartRow> {
        let qty = validate_quantity(qty)?;
        let price = validate_price(price)?;
        validate_attributes(&attributes)?;
        let raw_id = fingerprint(&id, &attributes);

        if let Some(existing) = cart.get(&raw_id).map(CartRow::qty) {
            let merged = existing
                .checked_add(qty)
                .ok_or(ValidationError::InvalidQuantity {
                    quantity: i64::from(existing) + i64::from(qty),
                })?;
            tracing::debug!(%raw_id, from = existing, to = merged, "merging duplicate row");
            metrics::counter!("cart_rows_merged").increment(1);

            let row = self
                .update_qty(cart, &raw_id, i64::from(merged))
                .await?
                .ok_or_else(|| CartError::NotFound {
                    raw_id: raw_id.clone(),
                })?;
            return Ok(row);
        }

        let row = CartRow::new(raw_id, id, name, qty, price, attributes)?;
        cart.check_total_with(&row)?;
        cart.put(row.clone());
        self.store.save(cart).await?;
        metrics::counter!("cart_rows_added").increment(1);

        Ok(row)
    }

    async fn update_qty(
        &self,
        cart: &mut Cart,
        raw_id: &RawId,
        qty: i64,
    ) -> Result<Option<CartRow>> {
        if qty <= 0 {
            self.remove_row(cart, raw_id).await?;
            return Ok(None);
        }

        let qty = validate_quantity(qty)?;
        let row = cart
            .get(raw_id)
            .ok_or_else(|| CartError::NotFound {
                raw_id: raw_id.clone(),
            })?
            .with_qty(qty)?;
        cart.check_total_with(&row)?;
        cart.put(row.clone());

        self.store.save(cart).await?;
        Ok(Some(row))
    }

    async fn update_attribute(
        &self,
        cart: &mut Cart,
        raw_id: &RawId,
        patch: &RowPatch,
    ) -> Result<CartRow> {
        let row = cart
            .get(raw_id)
            .ok_or_else(|| CartError::NotFound {
                raw_id: raw_id.clone(),
            })?
            .patched(patch)?;
        cart.check_total_with(&row)?;
        cart.put(row.clone());

        self.store.save(cart).await?;
        Ok(row)
    }

    async fn remove_row(&self, cart: &mut Cart, raw_id: &RawId) -> Result<()> {
        let Some(row) = cart.get(raw_id).cloned() else {
            return Ok(());
        };

        self.events.emit(CartEvent::removing(self.session(), &row, cart));
        cart.forget(raw_id);
        self.events.emit(CartEvent::removed(self.session(), &row, cart));

        self.store.save(cart).await?;
        metrics::counter!("cart_rows_removed").increment(1);
        tracing::debug!(%raw_id, "row removed");

        Ok(())
    }
}
