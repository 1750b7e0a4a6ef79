//! Deck helpers: validation, statistics, ordering and automatic selection.

use super::elements::ElementTable;
use super::types::{DuelCard, Element};
use crate::core::constants::DECK_SIZE;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck must contain exactly {expected} cards, got {len}")]
    WrongSize { len: usize, expected: usize },
    #[error("invalid card in deck at position {index}")]
    InvalidCard { index: usize },
}

/// A deck is playable when it has exactly nine cards and every card carries
/// an id and a known element.
pub fn validate_deck(deck: &[DuelCard]) -> Result<(), DeckError> {
    if deck.len() != DECK_SIZE {
        return Err(DeckError::WrongSize {
            len: deck.len(),
            expected: DECK_SIZE,
        });
    }
    match deck
        .iter()
        .position(|c| c.card_id.trim().is_empty() || c.element == Element::Unknown)
    {
        Some(index) => Err(DeckError::InvalidCard { index }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeckStats {
    pub total_attack: u32,
    pub total_defense: u32,
    pub avg_attack: u32,
    pub avg_defense: u32,
    pub elements: BTreeMap<Element, usize>,
}

pub fn deck_stats(deck: &[DuelCard]) -> DeckStats {
    if deck.is_empty() {
        return DeckStats::default();
    }
    let total_attack = saturating_total(deck.iter().map(|c| c.attack));
    let total_defense = saturating_total(deck.iter().map(|c| c.defense));
    let mut elements = BTreeMap::new();
    for card in deck {
        *elements.entry(card.element).or_insert(0) += 1;
    }
    let n = deck.len() as f64;
    DeckStats {
        total_attack,
        total_defense,
        avg_attack: (total_attack as f64 / n).round() as u32,
        avg_defense: (total_defense as f64 / n).round() as u32,
        elements,
    }
}

/// Sum of the fighting power of every card; the exchange duel uses this as
/// starting HP when the caller asks for power-based HP.
pub fn deck_total_power(deck: &[DuelCard]) -> u32 {
    saturating_total(deck.iter().map(|c| c.power))
}

pub(crate) fn saturating_total(values: impl Iterator<Item = u32>) -> u32 {
    values.fold(0u32, u32::saturating_add)
}

/// Element name ascending, then attack descending.
pub fn sort_deck(deck: &[DuelCard]) -> Vec<DuelCard> {
    let mut sorted = deck.to_vec();
    sorted.sort_by(|a, b| {
        a.element
            .name()
            .cmp(b.element.name())
            .then_with(|| b.attack.cmp(&a.attack))
    });
    sorted
}

pub fn shuffle_deck<R: Rng + ?Sized>(deck: &mut [DuelCard], rng: &mut R) {
    deck.shuffle(rng);
}

/// Up to `count` random cards from `available`.
pub fn auto_fill_deck<R: Rng + ?Sized>(available: &[DuelCard], count: usize, rng: &mut R) -> Vec<DuelCard> {
    available
        .choose_multiple(rng, count.min(available.len()))
        .cloned()
        .collect()
}

/// Picks `count` cards spread as evenly as possible over the elements present
/// in `available`, topping up at random when an element runs short.
pub fn balance_deck<R: Rng + ?Sized>(available: &[DuelCard], count: usize, rng: &mut R) -> Vec<DuelCard> {
    if available.len() <= count {
        return available.to_vec();
    }

    let mut elements: Vec<Element> = Vec::new();
    for card in available {
        if !elements.contains(&card.element) {
            elements.push(card.element);
        }
    }
    let per_element = count / elements.len();
    let remainder = count % elements.len();

    let mut taken = vec![false; available.len()];
    for (i, element) in elements.iter().enumerate() {
        let want = per_element + usize::from(i < remainder);
        let candidates: Vec<usize> = (0..available.len())
            .filter(|&idx| available[idx].element == *element)
            .collect();
        for &idx in candidates.choose_multiple(rng, want.min(candidates.len())) {
            taken[idx] = true;
        }
    }

    let mut picked: Vec<usize> = (0..available.len()).filter(|&i| taken[i]).collect();
    if picked.len() < count {
        let rest: Vec<usize> = (0..available.len()).filter(|&i| !taken[i]).collect();
        picked.extend(rest.choose_multiple(rng, count - picked.len()));
    }
    picked.truncate(count);
    picked.into_iter().map(|i| available[i].clone()).collect()
}

/// The card to lead with. Always the first card of the deck.
pub fn find_best_card<'a>(deck: &'a [DuelCard], _opponent: &DuelCard) -> Option<&'a DuelCard> {
    deck.first()
}

/// The card scoring highest on `attack * multiplier - opponent.attack / 2`.
/// Ties keep the earliest card.
pub fn find_best_card_by_element<'a>(
    deck: &'a [DuelCard],
    opponent: &DuelCard,
    table: ElementTable,
) -> Option<&'a DuelCard> {
    let score = |card: &DuelCard| {
        card.attack as f64 * table.multiplier(card.element, opponent.element) - opponent.attack as f64 / 2.0
    };
    let mut best: Option<(&DuelCard, f64)> = None;
    for card in deck {
        let s = score(card);
        if best.map_or(true, |(_, top)| s > top) {
            best = Some((card, s));
        }
    }
    best.map(|(card, _)| card)
}
