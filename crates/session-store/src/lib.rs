pub mod error;
pub mod memory;
pub mod store;

pub use common::SessionKey;
pub use error::{Result, StorageError};
pub use memory::InMemorySessionStore;
pub use store::{SessionStore, SessionStoreExt};
