use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Result, SessionKey};

/// Core trait for session storage backends.
///
/// A session store holds opaque JSON values under a name within a session.
/// Values never cross sessions. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the value stored under `name` for the session.
    ///
    /// Returns None if nothing has been stored.
    async fn load(&self, session: &SessionKey, name: &str) -> Result<Option<Value>>;

    /// Writes a value under `name` for the session, replacing any previous one.
    ///
    /// `Value::Null` is a valid value and acts as an explicit cleared marker.
    async fn store(&self, session: &SessionKey, name: &str, value: Value) -> Result<()>;
}

/// Extension trait providing typed access on top of [`SessionStore`].
#[async_trait]
pub trait SessionStoreExt: SessionStore {
    /// Loads and deserializes a value.
    ///
    /// A stored `null` is treated the same as a missing value.
    async fn load_as<T>(&self, session: &SessionKey, name: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.load(session, name).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Serializes and stores a value.
    async fn store_as<T>(&self, session: &SessionKey, name: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value)?;
        self.store(session, name, value).await
    }

    /// Checks if a non-null value is stored under `name`.
    async fn has(&self, session: &SessionKey, name: &str) -> Result<bool> {
        Ok(!matches!(self.load(session, name).await?, None | Some(Value::Null)))
    }
}

// Blanket implementation for all SessionStore implementations
impl<T: SessionStore + ?Sized> SessionStoreExt for T {}
