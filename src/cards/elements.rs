use super::types::Element;
use crate::core::constants::{NEUTRAL_MULTIPLIER, STRONG_MULTIPLIER, WEAK_MULTIPLIER};
use serde::{Deserialize, Serialize};

/// Named element-effectiveness tables. The two are kept apart on purpose:
/// the hand duel uses the four-element steampunk cycle, the exchange duel the
/// six-element one, and their counters differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementTable {
    /// Fire -> Air -> Earth -> Water -> Fire
    #[default]
    Steampunk,
    /// Fire -> Ice -> Lightning -> Air -> Earth -> Water -> Fire
    Extended,
}

const STEAMPUNK_ELEMENTS: [Element; 4] = [Element::Fire, Element::Water, Element::Air, Element::Earth];

const EXTENDED_ELEMENTS: [Element; 6] = [
    Element::Fire,
    Element::Water,
    Element::Earth,
    Element::Air,
    Element::Lightning,
    Element::Ice,
];

/// How an attack lands, derived from its multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    Effective,
    Neutral,
    Weak,
}

impl Effectiveness {
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier > NEUTRAL_MULTIPLIER {
            Effectiveness::Effective
        } else if multiplier < NEUTRAL_MULTIPLIER {
            Effectiveness::Weak
        } else {
            Effectiveness::Neutral
        }
    }
}

impl ElementTable {
    pub fn elements(&self) -> &'static [Element] {
        match self {
            ElementTable::Steampunk => &STEAMPUNK_ELEMENTS,
            ElementTable::Extended => &EXTENDED_ELEMENTS,
        }
    }

    pub fn contains(&self, element: Element) -> bool {
        self.elements().contains(&element)
    }

    /// The single element `element` is strong against in this table.
    pub fn strong_against(&self, element: Element) -> Option<Element> {
        match self {
            ElementTable::Steampunk => match element {
                Element::Fire => Some(Element::Air),
                Element::Air => Some(Element::Earth),
                Element::Earth => Some(Element::Water),
                Element::Water => Some(Element::Fire),
                _ => None,
            },
            ElementTable::Extended => match element {
                Element::Fire => Some(Element::Ice),
                Element::Ice => Some(Element::Lightning),
                Element::Lightning => Some(Element::Air),
                Element::Air => Some(Element::Earth),
                Element::Earth => Some(Element::Water),
                Element::Water => Some(Element::Fire),
                Element::Unknown => None,
            },
        }
    }

    /// The single element `element` is weak against in this table.
    pub fn weak_against(&self, element: Element) -> Option<Element> {
        self.elements()
            .iter()
            .copied()
            .find(|other| self.strong_against(*other) == Some(element))
    }

    /// Attack multiplier for `attacker` hitting `defender`. Pairs outside the
    /// table are neutral.
    pub fn multiplier(&self, attacker: Element, defender: Element) -> f64 {
        if attacker == defender {
            return NEUTRAL_MULTIPLIER;
        }
        if self.strong_against(attacker) == Some(defender) {
            STRONG_MULTIPLIER
        } else if self.strong_against(defender) == Some(attacker) {
            WEAK_MULTIPLIER
        } else {
            NEUTRAL_MULTIPLIER
        }
    }

    pub fn effectiveness(&self, attacker: Element, defender: Element) -> Effectiveness {
        Effectiveness::from_multiplier(self.multiplier(attacker, defender))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: [ElementTable; 2] = [ElementTable::Steampunk, ElementTable::Extended];

    #[test]
    fn test_steampunk_pairs_match_reference_grid() {
        use Element::*;
        let t = ElementTable::Steampunk;
        assert_eq!(t.multiplier(Fire, Air), 1.5);
        assert_eq!(t.multiplier(Fire, Water), 0.5);
        assert_eq!(t.multiplier(Fire, Earth), 1.0);
        assert_eq!(t.multiplier(Water, Fire), 1.5);
        assert_eq!(t.multiplier(Water, Earth), 0.5);
        assert_eq!(t.multiplier(Water, Air), 1.0);
        assert_eq!(t.multiplier(Air, Earth), 1.5);
        assert_eq!(t.multiplier(Air, Fire), 0.5);
        assert_eq!(t.multiplier(Earth, Water), 1.5);
        assert_eq!(t.multiplier(Earth, Air), 0.5);
    }

    #[test]
    fn test_extended_pairs_match_reference_grid() {
        use Element::*;
        let t = ElementTable::Extended;
        assert_eq!(t.multiplier(Fire, Ice), 1.5);
        assert_eq!(t.multiplier(Fire, Water), 0.5);
        assert_eq!(t.multiplier(Fire, Air), 1.0);
        assert_eq!(t.multiplier(Water, Fire), 1.5);
        assert_eq!(t.multiplier(Water, Earth), 0.5);
        assert_eq!(t.multiplier(Earth, Water), 1.5);
        assert_eq!(t.multiplier(Earth, Air), 0.5);
        assert_eq!(t.multiplier(Air, Earth), 1.5);
        assert_eq!(t.multiplier(Air, Lightning), 0.5);
        assert_eq!(t.multiplier(Lightning, Air), 1.5);
        assert_eq!(t.multiplier(Lightning, Ice), 0.5);
        assert_eq!(t.multiplier(Ice, Lightning), 1.5);
        assert_eq!(t.multiplier(Ice, Fire), 0.5);
    }

    #[test]
    fn test_strong_pairs_are_weak_in_reverse() {
        for table in TABLES {
            for &a in table.elements() {
                for &b in table.elements() {
                    if table.multiplier(a, b) == STRONG_MULTIPLIER {
                        assert_eq!(table.multiplier(b, a), WEAK_MULTIPLIER, "{table:?} {a} vs {b}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_self_pairs_are_neutral() {
        for table in TABLES {
            for &e in table.elements() {
                assert_eq!(table.multiplier(e, e), 1.0);
            }
        }
    }

    #[test]
    fn test_each_element_has_one_counter_each_way() {
        for table in TABLES {
            for &a in table.elements() {
                let strong = table.elements().iter().filter(|&&b| table.multiplier(a, b) == 1.5).count();
                let weak = table.elements().iter().filter(|&&b| table.multiplier(a, b) == 0.5).count();
                assert_eq!((strong, weak), (1, 1), "{table:?} {a}");
                assert!(table.weak_against(a).is_some());
            }
        }
    }

    #[test]
    fn test_unknown_pairs_default_to_neutral() {
        let t = ElementTable::Steampunk;
        assert_eq!(t.multiplier(Element::Lightning, Element::Air), 1.0);
        assert_eq!(t.multiplier(Element::Unknown, Element::Fire), 1.0);
        assert_eq!(ElementTable::Extended.multiplier(Element::Fire, Element::Unknown), 1.0);
    }

    #[test]
    fn test_effectiveness_labels() {
        let t = ElementTable::Extended;
        assert_eq!(t.effectiveness(Element::Water, Element::Fire), Effectiveness::Effective);
        assert_eq!(t.effectiveness(Element::Fire, Element::Water), Effectiveness::Weak);
        assert_eq!(t.effectiveness(Element::Fire, Element::Earth), Effectiveness::Neutral);
    }
}
