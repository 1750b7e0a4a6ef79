use crate::cards::types::Card;
use crate::core::constants::{XP_NEED_BASE, XP_NEED_LINEAR, XP_NEED_QUADRATIC};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// XP-based level of one card id. `xp` is always below `xp_needed(level)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardProgress {
    pub level: u32,
    pub xp: u32,
}

impl Default for CardProgress {
    fn default() -> Self {
        Self { level: 1, xp: 0 }
    }
}

impl CardProgress {
    /// Adds XP and levels up while enough is banked. Returns levels gained.
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.level = self.level.max(1);
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.xp >= xp_needed(self.level) {
            self.xp -= xp_needed(self.level);
            self.level = self.level.saturating_add(1);
            gained += 1;
        }
        gained
    }

    /// Fraction of the way to the next level, in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.xp as f64 / xp_needed(self.level) as f64
    }
}

/// XP needed to go from `level` to `level + 1`, saturating at `u32::MAX`.
pub fn xp_needed(level: u32) -> u32 {
    let step = level.max(1) - 1;
    XP_NEED_QUADRATIC
        .saturating_mul(step)
        .saturating_mul(step)
        .saturating_add(XP_NEED_LINEAR.saturating_mul(step))
        .saturating_add(XP_NEED_BASE)
}

/// XP granted when a copy at `level` is absorbed.
pub fn xp_value(level: u32) -> u32 {
    let level = level as f64;
    (5.0 * level * (level + 3.0) / 4.0).round() as u32
}

/// Progress entry for `card_id`, created at level 1 on first access.
pub fn progress_entry<'a>(progress: &'a mut HashMap<String, CardProgress>, card_id: &str) -> &'a mut CardProgress {
    progress.entry(card_id.to_string()).or_default()
}

pub fn add_xp(progress: &mut HashMap<String, CardProgress>, card_id: &str, amount: u32) -> CardProgress {
    let entry = progress_entry(progress, card_id);
    entry.add_xp(amount);
    *entry
}

/// A copy can feed another card of the same element, never itself.
pub fn can_absorb(target: &Card, consumed: &Card) -> bool {
    target.id != consumed.id && target.element == consumed.element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::types::{Element, Rarity};

    #[test]
    fn test_xp_needed_curve() {
        assert_eq!(xp_needed(1), 20);
        assert_eq!(xp_needed(2), 34);
        assert_eq!(xp_needed(3), 52);
        assert_eq!(xp_needed(4), 74);
        assert_eq!(xp_needed(0), 20);
    }

    #[test]
    fn test_xp_curve_saturates_at_huge_levels() {
        assert_eq!(xp_needed(u32::MAX), u32::MAX);
        assert_eq!(xp_needed(100_000), u32::MAX);
        assert_eq!(xp_value(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_add_xp_saturates_instead_of_overflowing() {
        let mut p = CardProgress { level: 1, xp: 19 };
        let gained = p.add_xp(u32::MAX);
        assert!(gained > 0);
        assert!(p.xp < xp_needed(p.level));

        let mut top = CardProgress { level: u32::MAX, xp: 10 };
        assert_eq!(top.add_xp(u32::MAX), 1);
        assert_eq!(top, CardProgress { level: u32::MAX, xp: 0 });
    }

    #[test]
    fn test_xp_value() {
        assert_eq!(xp_value(1), 5);
        assert_eq!(xp_value(2), 13);
        assert_eq!(xp_value(5), 50);
    }

    #[test]
    fn test_add_xp_rolls_over_levels() {
        let mut map = HashMap::new();
        let progress = add_xp(&mut map, "F01-R1", 55);
        assert_eq!(progress, CardProgress { level: 3, xp: 1 });
        assert_eq!(map.get("F01-R1"), Some(&progress));
    }

    #[test]
    fn test_add_xp_exact_threshold() {
        let mut p = CardProgress::default();
        assert_eq!(p.add_xp(20), 1);
        assert_eq!(p, CardProgress { level: 2, xp: 0 });
        assert_eq!(p.add_xp(33), 0);
        assert!(p.fraction() < 1.0);
    }

    #[test]
    fn test_progress_entry_is_lazy() {
        let mut map = HashMap::new();
        assert_eq!(*progress_entry(&mut map, "X"), CardProgress::default());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_can_absorb_rules() {
        let target = Card::new("F01-R1", Element::Fire, Rarity::Common, 10);
        let same_element = Card::new("F02-R1", Element::Fire, Rarity::Common, 10);
        let other_element = Card::new("W01-R1", Element::Water, Rarity::Common, 10);
        assert!(can_absorb(&target, &same_element));
        assert!(!can_absorb(&target, &target));
        assert!(!can_absorb(&target, &other_element));
    }
}
