//! Loads and saves one session's cart through a [`SessionStore`].

use common::SessionKey;
use serde_json::Value;
use session_store::SessionStore;

use crate::cart::Cart;
use crate::config::DEFAULT_CART_NAME;
use crate::error::Result;

/// Cart persistence for a single session.
///
/// The cart lives under `name` within the session. Renaming the store does
/// not move data already saved under the previous name.
pub struct CartStore<S: SessionStore> {
    store: S,
    session: SessionKey,
    name: String,
}

impl<S: SessionStore> CartStore<S> {
    /// Creates a store for the session using the default cart name.
    pub fn new(store: S, session: SessionKey) -> Self {
        Self {
            store,
            session,
            name: DEFAULT_CART_NAME.to_string(),
        }
    }

    /// Builder-style rename.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> &SessionKey {
        &self.session
    }

    /// Returns a reference to the underlying session store.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Loads the cart.
    ///
    /// Missing, null, or undecodable values yield an empty cart. Only backend
    /// failures are returned as errors.
    pub async fn load(&self) -> Result<Cart> {
        let value = self.store.load(&self.session, &self.name).await?;

        let cart = match value {
            None | Some(Value::Null) => Cart::new(),
            Some(value) => match serde_json::from_value::<Cart>(value) {
                Ok(cart) => cart.normalized(),
                Err(e) => {
                    tracing::warn!(
                        session = %self.session,
                        name = %self.name,
                        error = %e,
                        "stored value is not a cart, starting empty"
                    );
                    metrics::counter!("cart_store_decode_failures").increment(1);
                    Cart::new()
                }
            },
        };

        Ok(cart)
    }

    /// Saves the cart, replacing what was stored.
    pub async fn save(&self, cart: &Cart) -> Result<()> {
        let value = serde_json::to_value(cart).map_err(session_store::StorageError::from)?;
        self.store.store(&self.session, &self.name, value).await?;
        metrics::counter!("cart_store_writes").increment(1);
        Ok(())
    }

    /// Stores the null marker in place of the cart.
    pub async fn clear(&self) -> Result<()> {
        self.store
            .store(&self.session, &self.name, Value::Null)
            .await?;
        metrics::counter!("cart_store_writes").increment(1);
        Ok(())
    }
}
