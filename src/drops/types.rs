use crate::cards::types::{Card, Element, Rarity};
use crate::core::constants::{DEFAULT_ELEMENT_WEIGHT, DEFAULT_RARITY_WEIGHTS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Drop weight per rarity, R1 through R6. Serialised as `{"R1": 60, ...}`;
/// rarities missing from the map weigh 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Rarity, f64>", into = "BTreeMap<Rarity, f64>")]
pub struct RarityWeights(pub [f64; 6]);

impl Default for RarityWeights {
    fn default() -> Self {
        Self(DEFAULT_RARITY_WEIGHTS)
    }
}

impl From<BTreeMap<Rarity, f64>> for RarityWeights {
    fn from(map: BTreeMap<Rarity, f64>) -> Self {
        let mut weights = [0.0; 6];
        for (rarity, weight) in map {
            weights[rarity.index()] = weight.max(0.0);
        }
        Self(weights)
    }
}

impl From<RarityWeights> for BTreeMap<Rarity, f64> {
    fn from(weights: RarityWeights) -> Self {
        Rarity::ALL.into_iter().map(|r| (r, weights.get(r))).collect()
    }
}

impl RarityWeights {
    pub fn get(&self, rarity: Rarity) -> f64 {
        self.0[rarity.index()]
    }

    pub fn set(&mut self, rarity: Rarity, weight: f64) {
        self.0[rarity.index()] = weight.max(0.0);
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Zeroes every rarity above `max`.
    pub fn clamped(&self, max: Option<Rarity>) -> Self {
        let Some(max) = max else { return *self };
        let mut out = *self;
        for rarity in Rarity::ALL {
            if rarity > max {
                out.set(rarity, 0.0);
            }
        }
        out
    }

    /// Rescales to sum to 100. An all-zero table stays all zero.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        let total = if total > 0.0 { total } else { 1.0 };
        let mut out = *self;
        for w in out.0.iter_mut() {
            *w = *w / total * 100.0;
        }
        out
    }

    pub fn highest_positive(&self) -> Option<Rarity> {
        Rarity::ALL.into_iter().rev().find(|r| self.get(*r) > 0.0)
    }

    /// One draw from a normalised table, falling back to common.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Rarity {
        let roll = rng.gen::<f64>() * 100.0;
        let mut cumulative = 0.0;
        for rarity in Rarity::ALL {
            let weight = self.get(rarity);
            cumulative += weight;
            if weight > 0.0 && roll <= cumulative {
                return rarity;
            }
        }
        Rarity::Common
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementWeight {
    pub element: Element,
    pub weight: f64,
}

/// Ordered element weights. Order matters: the first entry is the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementWeights(pub Vec<ElementWeight>);

impl Default for ElementWeights {
    fn default() -> Self {
        Self(
            [Element::Fire, Element::Water, Element::Air, Element::Earth]
                .into_iter()
                .map(|element| ElementWeight {
                    element,
                    weight: DEFAULT_ELEMENT_WEIGHT,
                })
                .collect(),
        )
    }
}

impl ElementWeights {
    pub fn total(&self) -> f64 {
        self.0.iter().map(|w| w.weight.max(0.0)).sum()
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Element> {
        let first = self.0.first()?.element;
        let total = self.total();
        if total <= 0.0 {
            return Some(first);
        }
        let roll = rng.gen_range(0.0..total);
        let mut cumulative = 0.0;
        for entry in &self.0 {
            cumulative += entry.weight.max(0.0);
            if roll < cumulative {
                return Some(entry.element);
            }
        }
        Some(first)
    }
}

/// Consecutive draws without a legendary / mythic. Only ever incremented by
/// one or reset to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PityCounters {
    pub no_legendary: u32,
    pub no_mythic: u32,
}

impl PityCounters {
    /// Rarity the counters force on the next draw, mythic first.
    pub fn forced(&self, legendary_after: u32, mythic_after: u32) -> Option<Rarity> {
        if self.no_mythic >= mythic_after {
            Some(Rarity::Mythic)
        } else if self.no_legendary >= legendary_after {
            Some(Rarity::Legendary)
        } else {
            None
        }
    }

    pub fn record(&mut self, rarity: Rarity) {
        match rarity {
            Rarity::Mythic => {
                self.no_legendary = 0;
                self.no_mythic = 0;
            }
            Rarity::Legendary => {
                self.no_legendary = 0;
                self.no_mythic += 1;
            }
            _ => {
                self.no_legendary += 1;
                self.no_mythic += 1;
            }
        }
    }
}

/// Per-call overrides of the configured drop tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropOptions {
    pub rarity_weights: Option<RarityWeights>,
    pub element_weights: Option<ElementWeights>,
    pub max_rarity: Option<Rarity>,
    pub guaranteed_at_least: Option<Rarity>,
}

impl DropOptions {
    pub fn with_max_rarity(mut self, rarity: Rarity) -> Self {
        self.max_rarity = Some(rarity);
        self
    }

    pub fn with_guaranteed_at_least(mut self, rarity: Rarity) -> Self {
        self.guaranteed_at_least = Some(rarity);
        self
    }

    pub fn with_rarity_weights(mut self, weights: RarityWeights) -> Self {
        self.rarity_weights = Some(weights);
        self
    }

    pub fn with_element_weights(mut self, weights: ElementWeights) -> Self {
        self.element_weights = Some(weights);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropResult {
    pub card: Option<Card>,
    /// `None` for starter-pool grants.
    pub rarity: Option<Rarity>,
    pub from_starter_pool: bool,
    pub pity: PityCounters,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchDropResult {
    pub cards: Vec<Card>,
    pub pity: PityCounters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DropSimulation {
    pub counts: BTreeMap<Rarity, u32>,
    pub starter_grants: u32,
    pub pity: PityCounters,
}
