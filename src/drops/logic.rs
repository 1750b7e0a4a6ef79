use super::types::{BatchDropResult, DropOptions, DropResult, DropSimulation, PityCounters};
use crate::cards::catalog::Catalog;
use crate::cards::types::{Card, Element, Rarity};
use crate::combat::types::DuelOutcome;
use crate::core::config::DropConfig;
use crate::profile::types::Inventory;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Rolls card rewards from a catalog.
#[derive(Debug, Clone)]
pub struct DropEngine<'a> {
    catalog: &'a Catalog,
    config: DropConfig,
}

impl<'a> DropEngine<'a> {
    pub fn new(catalog: &'a Catalog, config: DropConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &DropConfig {
        &self.config
    }

    /// True once the inventory holds at least one copy of every starter card.
    pub fn starter_collection_complete(&self, inventory: &Inventory) -> bool {
        self.catalog
            .starter_pool()
            .iter()
            .all(|card| inventory.get(&card.id).copied().unwrap_or(0) > 0)
    }

    /// Rarity forced by pity, capped to `max_rarity` and moved down to the
    /// highest rarity that can actually drop.
    fn forced_rarity(&self, pity: &PityCounters, options: &DropOptions) -> Option<Rarity> {
        let mut forced = pity.forced(
            self.config.legendary_guarantee_after,
            self.config.mythic_guarantee_after,
        )?;
        if let Some(max) = options.max_rarity {
            forced = forced.min(max);
        }
        let capped = options
            .rarity_weights
            .unwrap_or(self.config.rarity_weights)
            .clamped(options.max_rarity);
        if capped.get(forced) > 0.0 {
            Some(forced)
        } else {
            capped.highest_positive()
        }
    }

    fn roll_rarity<R: Rng + ?Sized>(&self, pity: &PityCounters, options: &DropOptions, rng: &mut R) -> Rarity {
        let mut rarity = match self.forced_rarity(pity, options) {
            Some(forced) => forced,
            None => options
                .rarity_weights
                .unwrap_or(self.config.rarity_weights)
                .clamped(options.max_rarity)
                .normalized()
                .roll(rng),
        };
        if let Some(floor) = options.guaranteed_at_least {
            rarity = rarity.max(floor);
        }
        if let Some(max) = options.max_rarity {
            rarity = rarity.min(max);
        }
        rarity
    }

    /// Exact match first, then rarity only, then element only, then anything.
    fn candidate_pool(&self, rarity: Rarity, element: Option<Element>) -> Vec<&'a Card> {
        let cards = self.catalog.cards();
        let exact: Vec<&Card> = cards
            .iter()
            .filter(|c| c.rarity == Some(rarity) && Some(c.element) == element)
            .collect();
        if !exact.is_empty() {
            return exact;
        }
        let by_rarity: Vec<&Card> = cards.iter().filter(|c| c.rarity == Some(rarity)).collect();
        if !by_rarity.is_empty() {
            return by_rarity;
        }
        let by_element: Vec<&Card> = cards.iter().filter(|c| Some(c.element) == element).collect();
        if !by_element.is_empty() {
            return by_element;
        }
        cards.iter().collect()
    }

    pub fn drop_card<R: Rng + ?Sized>(
        &self,
        inventory: &Inventory,
        pity: PityCounters,
        options: &DropOptions,
        rng: &mut R,
    ) -> DropResult {
        if self.config.starter_gating && !self.starter_collection_complete(inventory) {
            let starters = self.catalog.starter_pool();
            if let Some(card) = starters.choose(rng) {
                return DropResult {
                    card: Some((*card).clone()),
                    rarity: None,
                    from_starter_pool: true,
                    pity,
                };
            }
        }

        let rarity = self.roll_rarity(&pity, options, rng);
        let element = options
            .element_weights
            .as_ref()
            .unwrap_or(&self.config.element_weights)
            .roll(rng);
        let card = self.candidate_pool(rarity, element).choose(rng).map(|c| (*c).clone());

        let mut pity = pity;
        pity.record(rarity);
        debug!(
            rarity = %rarity,
            element = ?element,
            card = ?card.as_ref().map(|c| c.id.as_str()),
            no_legendary = pity.no_legendary,
            no_mythic = pity.no_mythic,
            "card dropped"
        );

        DropResult {
            card,
            rarity: Some(rarity),
            from_starter_pool: false,
            pity,
        }
    }

    /// `count` drops in a row, each seeing the pity counters left by the last.
    pub fn drop_cards<R: Rng + ?Sized>(
        &self,
        inventory: &Inventory,
        count: usize,
        pity: PityCounters,
        options: &DropOptions,
        rng: &mut R,
    ) -> BatchDropResult {
        let mut batch = BatchDropResult {
            cards: Vec::with_capacity(count),
            pity,
        };
        for _ in 0..count {
            let result = self.drop_card(inventory, batch.pity, options, rng);
            batch.cards.extend(result.card);
            batch.pity = result.pity;
        }
        batch
    }

    /// Tallies rarities over `trials` drops starting from fresh pity counters.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        inventory: &Inventory,
        trials: u32,
        options: &DropOptions,
        rng: &mut R,
    ) -> DropSimulation {
        let mut sim = DropSimulation::default();
        for _ in 0..trials {
            let result = self.drop_card(inventory, sim.pity, options, rng);
            sim.pity = result.pity;
            if result.from_starter_pool {
                sim.starter_grants += 1;
            }
            if let Some(rarity) = result.rarity.or_else(|| result.card.as_ref().and_then(|c| c.rarity)) {
                *sim.counts.entry(rarity).or_insert(0) += 1;
            }
        }
        sim
    }

    /// Post-duel drop chance. Every outcome uses the same configured rate.
    pub fn drop_chance(&self, _outcome: DuelOutcome) -> f64 {
        self.config.post_duel_chance
    }

    pub fn should_drop_after_duel<R: Rng + ?Sized>(&self, outcome: DuelOutcome, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.drop_chance(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drops::types::RarityWeights;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn catalog() -> Catalog {
        let mut cards = Vec::new();
        for element in [Element::Fire, Element::Water, Element::Air, Element::Earth] {
            for rarity in [Rarity::Common, Rarity::Uncommon, Rarity::Rare, Rarity::Epic] {
                cards.push(Card::new(&format!("{element}-{rarity}"), element, rarity, 10));
            }
        }
        cards.push(Card::new("S01", Element::Fire, Rarity::Common, 12).as_starter());
        cards.push(Card::new("S02", Element::Water, Rarity::Common, 12).as_starter());
        Catalog::new(cards)
    }

    fn owned_starters() -> Inventory {
        Inventory::from([("S01".to_string(), 1), ("S02".to_string(), 2)])
    }

    #[test]
    fn test_starter_pool_until_complete() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pity = PityCounters { no_legendary: 3, no_mythic: 4 };

        let partial = Inventory::from([("S01".to_string(), 1)]);
        let result = engine.drop_card(&partial, pity, &DropOptions::default(), &mut rng);
        assert!(result.from_starter_pool);
        assert_eq!(result.rarity, None);
        assert_eq!(result.pity, pity);
        assert!(result.card.is_some_and(|c| c.starter));

        let result = engine.drop_card(&owned_starters(), pity, &DropOptions::default(), &mut rng);
        assert!(!result.from_starter_pool);
        assert!(result.rarity.is_some());
    }

    #[test]
    fn test_gating_disabled_skips_starters() {
        let catalog = catalog();
        let config = DropConfig {
            starter_gating: false,
            ..DropConfig::default()
        };
        let engine = DropEngine::new(&catalog, config);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let result = engine.drop_card(&Inventory::new(), PityCounters::default(), &DropOptions::default(), &mut rng);
        assert!(!result.from_starter_pool);
    }

    #[test]
    fn test_max_rarity_caps_rolls() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let options = DropOptions::default().with_max_rarity(Rarity::Uncommon);
        for _ in 0..200 {
            let r = engine.drop_card(&owned_starters(), PityCounters::default(), &options, &mut rng);
            assert!(r.rarity.is_some_and(|r| r <= Rarity::Uncommon));
        }
    }

    #[test]
    fn test_guaranteed_floor_raises_rarity() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let options = DropOptions::default().with_guaranteed_at_least(Rarity::Rare);
        for _ in 0..100 {
            let r = engine.drop_card(&owned_starters(), PityCounters::default(), &options, &mut rng);
            assert!(r.rarity.is_some_and(|r| r >= Rarity::Rare));
        }
    }

    #[test]
    fn test_forced_rarity_falls_back_to_highest_positive_weight() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let pity = PityCounters { no_legendary: 40, no_mythic: 0 };
        let r = engine.drop_card(&owned_starters(), pity, &DropOptions::default(), &mut rng);
        assert_eq!(r.rarity, Some(Rarity::Epic));
        assert_eq!(r.pity, PityCounters { no_legendary: 41, no_mythic: 1 });
    }

    #[test]
    fn test_forced_rarity_capped_by_max() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let pity = PityCounters { no_legendary: 0, no_mythic: 500 };
        let options = DropOptions::default()
            .with_rarity_weights(RarityWeights([10.0; 6]))
            .with_max_rarity(Rarity::Rare);
        let r = engine.drop_card(&owned_starters(), pity, &options, &mut rng);
        assert_eq!(r.rarity, Some(Rarity::Rare));
    }

    #[test]
    fn test_pool_falls_back_when_rarity_missing() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let options = DropOptions::default().with_rarity_weights(RarityWeights([0.0, 0.0, 0.0, 0.0, 0.0, 1.0]));
        for _ in 0..50 {
            let r = engine.drop_card(&owned_starters(), PityCounters::default(), &options, &mut rng);
            assert_eq!(r.rarity, Some(Rarity::Mythic));
            assert!(r.card.is_some());
        }
    }

    #[test]
    fn test_batch_threads_pity() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let batch = engine.drop_cards(&owned_starters(), 10, PityCounters::default(), &DropOptions::default(), &mut rng);
        assert_eq!(batch.cards.len(), 10);
        assert_eq!(batch.pity, PityCounters { no_legendary: 10, no_mythic: 10 });
    }

    #[test]
    fn test_simulation_counts_every_trial() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let sim = engine.simulate(&owned_starters(), 1_000, &DropOptions::default(), &mut rng);
        assert_eq!(sim.counts.values().sum::<u32>(), 1_000);
        assert_eq!(sim.starter_grants, 0);
    }

    #[test]
    fn test_post_duel_chance_is_flat() {
        let catalog = catalog();
        let engine = DropEngine::new(&catalog, DropConfig::default());
        for outcome in [DuelOutcome::Victory, DuelOutcome::Defeat, DuelOutcome::Draw] {
            assert_eq!(engine.drop_chance(outcome), 0.05);
        }
        let never = DropEngine::new(
            &catalog,
            DropConfig {
                post_duel_chance: 0.0,
                ..DropConfig::default()
            },
        );
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        assert!((0..100).all(|_| !never.should_drop_after_duel(DuelOutcome::Victory, &mut rng)));
    }
}
