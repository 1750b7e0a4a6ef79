use super::types::{Card, Element};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The full card catalog. Built once and shared by reference; nothing in the
/// engine mutates it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, keeping the first entry when an id repeats.
    pub fn new(cards: Vec<Card>) -> Self {
        let mut kept = Vec::with_capacity(cards.len());
        let mut by_id = HashMap::with_capacity(cards.len());
        for card in cards {
            if by_id.contains_key(&card.id) {
                warn!(card_id = %card.id, "duplicate catalog id, keeping first entry");
                continue;
            }
            if card.base_power.is_none() {
                warn!(card_id = %card.id, "catalog entry has no basePower, its power will read as 0");
            }
            if card.rarity.is_none() {
                warn!(card_id = %card.id, "catalog entry has no known rarity");
            }
            by_id.insert(card.id.clone(), kept.len());
            kept.push(card);
        }
        Self { cards: kept, by_id }
    }

    /// Parses a JSON array of cards.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Ok(Self::new(cards))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|&i| &self.cards[i])
    }

    pub fn by_element(&self, element: Element) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.element == element).collect()
    }

    /// Every card, in catalog order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Cards granted to new players until each has been collected once.
    pub fn starter_pool(&self) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.starter).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
