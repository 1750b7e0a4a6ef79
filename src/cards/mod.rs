//! Card data: elements, rarities, the catalog and deck helpers.

pub mod catalog;
pub mod deck;
pub mod elements;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use deck::{deck_stats, deck_total_power, validate_deck, DeckError, DeckStats};
pub use elements::{Effectiveness, ElementTable};
pub use types::{Card, CardInstance, DuelCard, Element, Rarity};
