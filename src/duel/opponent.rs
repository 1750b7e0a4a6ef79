//! Enemy deck generation scaled to the player's deck power.

use crate::cards::catalog::Catalog;
use crate::cards::deck::saturating_total;
use crate::cards::types::{Card, DuelCard};
use crate::core::constants::{DECK_SIZE, ENEMY_LEVEL_CAP, ENEMY_LEVEL_UP_ATTEMPTS, ENEMY_TARGET_OFFSET};
use crate::progression::power::additive_power;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyDeck {
    pub target_total: u32,
    pub offset: i64,
    pub cards: Vec<DuelCard>,
}

impl EnemyDeck {
    pub fn total_power(&self) -> u32 {
        saturating_total(self.cards.iter().map(|c| c.power))
    }
}

/// Sum of the `count` largest values, skipping index `skip`.
fn top_sum(powers: &[u32], count: usize, skip: usize) -> u64 {
    let mut rest: Vec<u32> = powers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, p)| *p)
        .collect();
    rest.sort_unstable_by(|a, b| b.cmp(a));
    rest.iter().take(count).map(|&p| p as u64).sum()
}

/// Greedy pick: each slot takes the card that brings `current + card + best
/// possible fill of the remaining slots` closest to `target`.
fn pick_cards<'a>(mut pool: Vec<&'a Card>, target: u32) -> Vec<&'a Card> {
    let mut picked = Vec::with_capacity(DECK_SIZE);
    let mut current: u64 = 0;
    for slot in 0..DECK_SIZE {
        if pool.is_empty() {
            break;
        }
        let powers: Vec<u32> = pool.iter().map(|c| additive_power(c, 1)).collect();
        let remaining = DECK_SIZE - slot - 1;
        let mut best: Option<(usize, u64)> = None;
        for (i, &p) in powers.iter().enumerate() {
            let projected = current + p as u64 + top_sum(&powers, remaining, i);
            let delta = projected.abs_diff(target as u64);
            if best.map_or(true, |(_, d)| delta < d) {
                best = Some((i, delta));
            }
        }
        let Some((index, _)) = best else { break };
        current += powers[index] as u64;
        picked.push(pool.remove(index));
    }
    picked
}

/// Builds a nine-card enemy deck whose total power lands near
/// `player_total` give or take a random offset of up to 20.
///
/// Non-starter cards are preferred. Cards are picked at level 1 and then
/// levelled one step at a time (largest gain first, capped at level 20)
/// until the total reaches the target or the step budget runs out.
pub fn build_enemy_deck<R: Rng + ?Sized>(catalog: &Catalog, player_total: u32, rng: &mut R) -> EnemyDeck {
    let offset = rng.gen_range(-ENEMY_TARGET_OFFSET..=ENEMY_TARGET_OFFSET);
    let target_total = (player_total as i64 + offset).max(0) as u32;

    let mut pool: Vec<&Card> = catalog.cards().iter().filter(|c| !c.starter).collect();
    if pool.len() < DECK_SIZE {
        pool = catalog.cards().iter().collect();
    }

    let mut picked = pick_cards(pool, target_total);
    if !picked.is_empty() {
        // Small catalogs repeat cards to fill the deck.
        let mut i = 0;
        while picked.len() < DECK_SIZE {
            picked.push(picked[i]);
            i += 1;
        }
    }

    let mut levels = vec![1u32; picked.len()];
    let mut powers: Vec<u32> = picked.iter().map(|c| additive_power(c, 1)).collect();
    let mut total = saturating_total(powers.iter().copied());
    let mut attempts = 0;
    while total < target_total && attempts < ENEMY_LEVEL_UP_ATTEMPTS {
        let mut best: Option<(usize, u32)> = None;
        for (i, card) in picked.iter().enumerate() {
            let next_level = (levels[i] + 1).min(ENEMY_LEVEL_CAP);
            let gain = additive_power(card, next_level).saturating_sub(powers[i]);
            if gain > best.map_or(0, |(_, g)| g) {
                best = Some((i, gain));
            }
        }
        let Some((i, _)) = best else { break };
        levels[i] = (levels[i] + 1).min(ENEMY_LEVEL_CAP);
        powers[i] = additive_power(picked[i], levels[i]);
        total = saturating_total(powers.iter().copied());
        attempts += 1;
    }

    let cards: Vec<DuelCard> = picked
        .iter()
        .zip(&levels)
        .map(|(card, &level)| DuelCard::from_card(card, level))
        .collect();
    debug!(player_total, offset, target_total, enemy_total = total, "enemy deck built");

    EnemyDeck {
        target_total,
        offset,
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::types::{Element, Rarity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn catalog() -> Catalog {
        let mut cards = Vec::new();
        for (i, element) in [Element::Fire, Element::Water, Element::Air, Element::Earth].into_iter().enumerate() {
            for rarity in Rarity::ALL {
                let base = 10 + 20 * rarity.rank() as u32 + i as u32;
                cards.push(Card::new(&format!("E{i}-{rarity}"), element, rarity, base));
            }
            cards.push(Card::new(&format!("S{i}"), element, Rarity::Common, 12).as_starter());
        }
        Catalog::new(cards)
    }

    #[test]
    fn test_deck_has_nine_non_starter_cards() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let deck = build_enemy_deck(&catalog(), 500, &mut rng);
        assert_eq!(deck.cards.len(), 9);
        assert!(deck.cards.iter().all(|c| !c.card_id.starts_with('S')));
        assert!((-20..=20).contains(&deck.offset));
    }

    #[test]
    fn test_total_reaches_target() {
        let catalog = catalog();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let deck = build_enemy_deck(&catalog, 900, &mut rng);
            assert!((880..=920).contains(&deck.target_total));
            assert!(
                deck.total_power() >= deck.target_total,
                "seed {seed}: total {} target {}",
                deck.total_power(),
                deck.target_total
            );
        }
    }

    #[test]
    fn test_greedy_pick_prefers_close_fit() {
        let catalog = catalog();
        let pool: Vec<&Card> = catalog.cards().iter().filter(|c| !c.starter).collect();
        let picked = pick_cards(pool, 1065);
        let total: u32 = picked.iter().map(|c| additive_power(c, 1)).sum();
        assert_eq!(picked.len(), 9);
        assert_eq!(total, 1065);
    }

    #[test]
    fn test_levels_up_when_catalog_is_weak() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let deck = build_enemy_deck(&catalog(), 5_000, &mut rng);
        assert!(deck.cards.iter().any(|c| c.level > 1));
        assert!(deck.cards.iter().all(|c| c.level <= 20));
        assert!(deck.cards.iter().all(|c| c.attack == c.power));
    }

    #[test]
    fn test_small_catalog_repeats_cards() {
        let small = Catalog::new(vec![
            Card::new("A", Element::Fire, Rarity::Common, 10),
            Card::new("B", Element::Water, Rarity::Common, 10),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let deck = build_enemy_deck(&small, 90, &mut rng);
        assert_eq!(deck.cards.len(), 9);
    }

    #[test]
    fn test_empty_catalog_gives_empty_deck() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let deck = build_enemy_deck(&Catalog::default(), 90, &mut rng);
        assert!(deck.cards.is_empty());
    }
}
