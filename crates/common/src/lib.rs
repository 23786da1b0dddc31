//! Shared types for the session cart workspace.

pub mod types;

pub use types::SessionKey;
