//! Player profile data and where it is kept.

pub mod store;
pub mod types;

pub use store::{JsonFileStore, MemoryStore, ProfileStore, StoreError};
pub use types::{Currencies, Inventory, PlayerProfile};
