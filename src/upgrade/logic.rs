//! Duplicate-consumption upgrades.
//!
//! Raising a deck card from level L to L+1 costs L duplicate copies of the
//! same card. Collection copies are spent first, then duplicates sitting in
//! other deck slots.

use crate::cards::types::CardInstance;
use crate::profile::store::StoreError;
use crate::profile::types::{Inventory, PlayerProfile};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("not enough duplicates: have {have}, need {need}")]
    InsufficientCopies { have: u32, need: u32 },

    #[error("deck slot {index} out of range (deck has {len} cards)")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("no card instance with uid {uid}")]
    UnknownInstance { uid: String },

    #[error("card {card_id} is not in the catalog")]
    UnknownCard { card_id: String },

    #[error("{consumed} cannot be absorbed into {target}")]
    InvalidAbsorb { target: String, consumed: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn upgrade_cost(level: u32) -> u32 {
    level.max(1)
}

/// Owned copies beyond the one sitting in the deck slot.
pub fn extra_copies(inventory: &Inventory, card_id: &str) -> u32 {
    inventory.get(card_id).copied().unwrap_or(0).saturating_sub(1)
}

pub fn can_upgrade(deck_card: &CardInstance, inventory: &Inventory) -> bool {
    extra_copies(inventory, &deck_card.card_id) >= upgrade_cost(deck_card.level)
}

pub fn has_any_upgradable(deck: &[CardInstance], inventory: &Inventory) -> bool {
    deck.iter().any(|c| can_upgrade(c, inventory))
}

/// Lowest-level copies of `card_id` first, as `(level, index)` pairs.
fn copies_by_level(cards: &[CardInstance], card_id: &str, skip: Option<usize>) -> Vec<(u32, usize)> {
    let mut copies: Vec<(u32, usize)> = cards
        .iter()
        .enumerate()
        .filter(|&(i, c)| c.card_id == card_id && Some(i) != skip)
        .map(|(i, c)| (c.level, i))
        .collect();
    copies.sort_unstable();
    copies
}

/// Raises the deck card in `slot` by one level. Duplicates come from the
/// collection (lowest level first) and then from other deck slots. Nothing
/// changes on error.
pub fn perform_upgrade(profile: &mut PlayerProfile, slot: usize) -> Result<u32, UpgradeError> {
    let len = profile.deck_cards.len();
    let deck_card = profile
        .deck_cards
        .get(slot)
        .ok_or(UpgradeError::SlotOutOfRange { index: slot, len })?;
    let card_id = deck_card.card_id.clone();
    let need = upgrade_cost(deck_card.level);

    let have = extra_copies(&profile.inventory(), &card_id);
    if have < need {
        return Err(UpgradeError::InsufficientCopies { have, need });
    }

    let mut from_collection: Vec<usize> = copies_by_level(&profile.collection, &card_id, None)
        .into_iter()
        .take(need as usize)
        .map(|(_, i)| i)
        .collect();
    let remaining = need as usize - from_collection.len();
    let mut from_deck: Vec<usize> = copies_by_level(&profile.deck_cards, &card_id, Some(slot))
        .into_iter()
        .take(remaining)
        .map(|(_, i)| i)
        .collect();

    from_collection.sort_unstable_by(|a, b| b.cmp(a));
    for index in from_collection {
        profile.collection.remove(index);
    }
    let shift = from_deck.iter().filter(|&&i| i < slot).count();
    from_deck.sort_unstable_by(|a, b| b.cmp(a));
    for index in from_deck {
        profile.deck_cards.remove(index);
    }

    let deck_card = &mut profile.deck_cards[slot - shift];
    deck_card.level = deck_card.level.saturating_add(1);
    Ok(deck_card.level)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpgradeStats {
    pub total_cards: usize,
    pub upgradable_cards: usize,
    pub total_duplicates: u32,
    /// Levels every deck card could gain if it spent all its duplicates.
    pub total_potential_levels: u32,
}

/// Levels reachable from `level` with `copies` duplicates.
pub fn potential_levels(level: u32, copies: u32) -> u32 {
    let mut remaining = copies;
    let mut level = level.max(1);
    let mut gained = 0;
    while remaining >= upgrade_cost(level) {
        remaining -= upgrade_cost(level);
        level = level.saturating_add(1);
        gained += 1;
    }
    gained
}

pub fn upgrade_stats(deck: &[CardInstance], inventory: &Inventory) -> UpgradeStats {
    let mut stats = UpgradeStats {
        total_cards: deck.len(),
        ..UpgradeStats::default()
    };
    for card in deck {
        let extra = extra_copies(inventory, &card.card_id);
        stats.total_duplicates += extra;
        if can_upgrade(card, inventory) {
            stats.upgradable_cards += 1;
        }
        stats.total_potential_levels += potential_levels(card.level, extra);
    }
    stats
}
