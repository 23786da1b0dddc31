//! Cart lifecycle notifications and the dispatcher boundary.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use common::SessionKey;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::cart::Cart;
use crate::row::CartRow;
use crate::value_objects::Attributes;

/// Notifications emitted around every cart mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A row is about to be added.
    Adding(AddData),

    /// A row was added or merged.
    Added(AddData),

    /// A row is about to be removed.
    Removing(RowData),

    /// A row was removed.
    Removed(RowData),

    /// A row is about to be updated.
    Updating(RowData),

    /// A row was updated, or removed when its quantity dropped to zero.
    Updated(UpdatedData),

    /// The cart is about to be cleared.
    Destroying(CartData),

    /// The cart was cleared.
    Destroyed(CartData),
}

impl CartEvent {
    /// Returns the dotted event name (`cart.adding`, `cart.added`, ...).
    pub fn event_name(&self) -> &'static str {
        match self {
            CartEvent::Adding(_) => "cart.adding",
            CartEvent::Added(_) => "cart.added",
            CartEvent::Removing(_) => "cart.removing",
            CartEvent::Removed(_) => "cart.removed",
            CartEvent::Updating(_) => "cart.updating",
            CartEvent::Updated(_) => "cart.updated",
            CartEvent::Destroying(_) => "cart.destroying",
            CartEvent::Destroyed(_) => "cart.destroyed",
        }
    }

    /// Returns the session the event belongs to.
    pub fn session(&self) -> &SessionKey {
        match self {
            CartEvent::Adding(data) | CartEvent::Added(data) => &data.session,
            CartEvent::Removing(data) | CartEvent::Removed(data) | CartEvent::Updating(data) => {
                &data.session
            }
            CartEvent::Updated(data) => &data.session,
            CartEvent::Destroying(data) | CartEvent::Destroyed(data) => &data.session,
        }
    }

    /// Returns the cart snapshot carried by the event.
    pub fn cart(&self) -> &Cart {
        match self {
            CartEvent::Adding(data) | CartEvent::Added(data) => &data.cart,
            CartEvent::Removing(data) | CartEvent::Removed(data) | CartEvent::Updating(data) => {
                &data.cart
            }
            CartEvent::Updated(data) => &data.cart,
            CartEvent::Destroying(data) | CartEvent::Destroyed(data) => &data.cart,
        }
    }
}

/// Data for Adding and Added events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddData {
    pub session: SessionKey,

    /// Attribute set of the row being added.
    pub attributes: Attributes,

    /// Cart snapshot: before the add for Adding, after it for Added.
    pub cart: Cart,

    pub occurred_at: DateTime<Utc>,
}

/// Data for Removing, Removed and Updating events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowData {
    pub session: SessionKey,

    /// The row as it was when the event was emitted.
    pub row: CartRow,

    pub cart: Cart,

    pub occurred_at: DateTime<Utc>,
}

/// Data for Updated events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedData {
    pub session: SessionKey,

    /// The updated row, or None if the update removed it.
    pub row: Option<CartRow>,

    pub cart: Cart,

    pub occurred_at: DateTime<Utc>,
}

/// Data for Destroying and Destroyed events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartData {
    pub session: SessionKey,

    /// The cart contents being cleared.
    pub cart: Cart,

    pub occurred_at: DateTime<Utc>,
}

// Convenience constructors for events
impl CartEvent {
    pub fn adding(session: &SessionKey, attributes: &Attributes, cart: &Cart) -> Self {
        CartEvent::Adding(AddData::new(session, attributes, cart))
    }

    pub fn added(session: &SessionKey, attributes: &Attributes, cart: &Cart) -> Self {
        CartEvent::Added(AddData::new(session, attributes, cart))
    }

    pub fn removing(session: &SessionKey, row: &CartRow, cart: &Cart) -> Self {
        CartEvent::Removing(RowData::new(session, row, cart))
    }

    pub fn removed(session: &SessionKey, row: &CartRow, cart: &Cart) -> Self {
        CartEvent::Removed(RowData::new(session, row, cart))
    }

    pub fn updating(session: &SessionKey, row: &CartRow, cart: &Cart) -> Self {
        CartEvent::Updating(RowData::new(session, row, cart))
    }

    pub fn updated(session: &SessionKey, row: Option<&CartRow>, cart: &Cart) -> Self {
        CartEvent::Updated(UpdatedData {
            session: session.clone(),
            row: row.cloned(),
            cart: cart.clone(),
            occurred_at: Utc::now(),
        })
    }

    pub fn destroying(session: &SessionKey, cart: &Cart) -> Self {
        CartEvent::Destroying(CartData::new(session, cart))
    }

    pub fn destroyed(session: &SessionKey, cart: &Cart) -> Self {
        CartEvent::Destroyed(CartData::new(session, cart))
    }
}

impl AddData {
    fn new(session: &SessionKey, attributes: &Attributes, cart: &Cart) -> Self {
        Self {
            session: session.clone(),
            attributes: attributes.clone(),
            cart: cart.clone(),
            occurred_at: Utc::now(),
        }
    }
}

impl RowData {
    fn new(session: &SessionKey, row: &CartRow, cart: &Cart) -> Self {
        Self {
            session: session.clone(),
            row: row.clone(),
            cart: cart.clone(),
            occurred_at: Utc::now(),
        }
    }
}

impl CartData {
    fn new(session: &SessionKey, cart: &Cart) -> Self {
        Self {
            session: session.clone(),
            cart: cart.clone(),
            occurred_at: Utc::now(),
        }
    }
}

/// Receives cart lifecycle notifications.
///
/// Emission is fire-and-forget: the cart never inspects the outcome and does
/// not require any observer to be present.
pub trait CartEventDispatcher: Send + Sync {
    fn emit(&self, event: CartEvent);
}

impl<D: CartEventDispatcher + ?Sized> CartEventDispatcher for Arc<D> {
    fn emit(&self, event: CartEvent) {
        (**self).emit(event);
    }
}

impl<D: CartEventDispatcher + ?Sized> CartEventDispatcher for Box<D> {
    fn emit(&self, event: CartEvent) {
        (**self).emit(event);
    }
}

/// Dispatcher that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDispatcher;

impl CartEventDispatcher for NullDispatcher {
    fn emit(&self, _event: CartEvent) {}
}

/// Dispatcher that keeps every event in memory, in emission order.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    events: Arc<Mutex<Vec<CartEvent>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events.
    pub fn events(&self) -> Vec<CartEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the names of all recorded events.
    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(CartEvent::event_name)
            .collect()
    }

    /// Clears the log.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl CartEventDispatcher for RecordingDispatcher {
    fn emit(&self, event: CartEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Dispatcher that publishes events on a tokio broadcast channel.
///
/// Events emitted while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    sender: broadcast::Sender<CartEvent>,
}

impl BroadcastDispatcher {
    /// Creates a dispatcher buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl CartEventDispatcher for BroadcastDispatcher {
    fn emit(&self, event: CartEvent) {
        let name = event.event_name();
        if self.sender.send(event).is_err() {
            tracing::trace!(event = name, "no cart event subscribers");
        }
    }
}
