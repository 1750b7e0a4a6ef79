use crate::cards::catalog::Catalog;
use crate::cards::types::{CardInstance, DuelCard};
use crate::core::constants::STARTING_BOLTS;
use crate::drops::types::PityCounters;
use crate::progression::xp::CardProgress;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Owned copies per card id, deck and collection together.
pub type Inventory = HashMap<String, u32>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currencies {
    pub bolts: u64,
    pub gears: u64,
    pub cores: u64,
}

/// Everything persisted for one player. Every field is optional on load so a
/// fresh or partially written profile still deserialises.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProfile {
    pub collection: Vec<CardInstance>,
    pub deck_cards: Vec<CardInstance>,
    #[serde(alias = "pityCounters")]
    pub pity: PityCounters,
    pub progress: HashMap<String, CardProgress>,
    pub currencies: Currencies,
}

impl PlayerProfile {
    pub fn new_player() -> Self {
        Self {
            currencies: Currencies {
                bolts: STARTING_BOLTS,
                ..Currencies::default()
            },
            ..Self::default()
        }
    }

    /// Recomputed from deck and collection on every call.
    pub fn inventory(&self) -> Inventory {
        let mut inventory = Inventory::new();
        for instance in self.deck_cards.iter().chain(&self.collection) {
            *inventory.entry(instance.card_id.clone()).or_insert(0) += 1;
        }
        inventory
    }

    pub fn collection_copies(&self, card_id: &str) -> u32 {
        self.collection.iter().filter(|c| c.card_id == card_id).count() as u32
    }

    pub fn find_in_collection(&self, uid: &str) -> Option<&CardInstance> {
        self.collection.iter().find(|c| c.uid == uid)
    }

    /// Deck cards in fighting form. Ids missing from the catalog are skipped.
    pub fn duel_deck(&self, catalog: &Catalog) -> Vec<DuelCard> {
        self.deck_cards
            .iter()
            .filter_map(|instance| match catalog.get(&instance.card_id) {
                Some(card) => Some(DuelCard::from_card(card, instance.level)),
                None => {
                    warn!(card_id = %instance.card_id, "deck card not in catalog, skipping");
                    None
                }
            })
            .collect()
    }
}
