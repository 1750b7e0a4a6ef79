//! Hand-of-three duel. Each side keeps a small hand drawn from its shuffled
//! deck; the cards in the chosen slot hit each other at the same time.

use super::error::{DuelError, Result};
use super::types::{DuelMode, DuelPhase, DuelSide, DuelSummary};
use crate::cards::deck::deck_total_power;
use crate::cards::elements::ElementTable;
use crate::cards::types::{DuelCard, Element};
use crate::combat::logic::mirror_damage;
use crate::combat::types::DuelOutcome;
use crate::core::config::DuelConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::info;

/// One side of a mirror duel. `deck` is read circularly from `cursor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSide {
    pub hp: u32,
    pub max_hp: u32,
    pub deck: Vec<DuelCard>,
    pub cursor: usize,
    pub hand: Vec<DuelCard>,
}

impl HandSide {
    fn new<R: Rng + ?Sized>(mut deck: Vec<DuelCard>, hand_size: usize, rng: &mut R) -> Self {
        let hp = deck_total_power(&deck);
        deck.shuffle(rng);
        let mut side = Self {
            hp,
            max_hp: hp,
            deck,
            cursor: 0,
            hand: Vec::with_capacity(hand_size),
        };
        for slot in 0..hand_size {
            let card = side.draw_unique(slot);
            side.hand.push(card);
        }
        side
    }

    fn next_card(&mut self) -> DuelCard {
        let card = self.deck[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.deck.len();
        card
    }

    /// Next card in cursor order whose id is not already in another slot.
    /// After one full pass without a match the next card is taken anyway.
    fn draw_unique(&mut self, slot: usize) -> DuelCard {
        let on_field: Vec<String> = self
            .hand
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slot)
            .map(|(_, c)| c.card_id.clone())
            .collect();
        for _ in 0..self.deck.len() {
            let candidate = self.next_card();
            if !on_field.contains(&candidate.card_id) {
                return candidate;
            }
        }
        self.next_card()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorStrike {
    pub card_id: String,
    pub element: Element,
    pub power: u32,
    pub damage: u32,
    pub multiplier: f64,
}

/// Record of one mirror turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorTurn {
    pub turn: u32,
    pub slot: usize,
    pub player: MirrorStrike,
    pub enemy: MirrorStrike,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct MirrorHandDuel {
    player: HandSide,
    enemy: HandSide,
    turn: u32,
    log: VecDeque<MirrorTurn>,
    log_cap: usize,
    table: ElementTable,
    started: bool,
    outcome: Option<DuelOutcome>,
}

impl MirrorHandDuel {
    /// HP of each side is the total power of its deck.
    pub fn new<R: Rng + ?Sized>(player_deck: Vec<DuelCard>, enemy_deck: Vec<DuelCard>, rng: &mut R) -> Result<Self> {
        Self::with_config(player_deck, enemy_deck, &DuelConfig::default(), rng)
    }

    pub fn with_config<R: Rng + ?Sized>(
        player_deck: Vec<DuelCard>,
        enemy_deck: Vec<DuelCard>,
        config: &DuelConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if player_deck.is_empty() {
            return Err(DuelError::EmptyDeck { side: DuelSide::Player });
        }
        if enemy_deck.is_empty() {
            return Err(DuelError::EmptyDeck { side: DuelSide::Enemy });
        }
        Ok(Self {
            player: HandSide::new(player_deck, config.hand_size, rng),
            enemy: HandSide::new(enemy_deck, config.hand_size, rng),
            turn: 1,
            log: VecDeque::with_capacity(config.log_cap),
            log_cap: config.log_cap.max(1),
            table: config.mirror_table,
            started: false,
            outcome: None,
        })
    }

    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            info!(player_hp = self.player.hp, enemy_hp = self.enemy.hp, "mirror duel started");
        }
    }

    pub fn player(&self) -> &HandSide {
        &self.player
    }

    pub fn enemy(&self) -> &HandSide {
        &self.enemy
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn outcome(&self) -> Option<DuelOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Most recent turns, oldest first.
    pub fn log(&self) -> impl Iterator<Item = &MirrorTurn> {
        self.log.iter()
    }

    pub fn last_turn(&self) -> Option<&MirrorTurn> {
        self.log.back()
    }

    pub fn hand_size(&self) -> usize {
        self.player.hand.len()
    }

    /// Plays `slot`: the cards in that slot on both sides hit each other and
    /// the slot refills on both sides.
    pub fn play_turn(&mut self, slot: usize) -> Result<MirrorTurn> {
        if self.is_finished() {
            return Err(DuelError::InvalidTransition {
                action: "play a turn",
                phase: DuelPhase::DuelEnd,
            });
        }
        let len = self.player.hand.len().min(self.enemy.hand.len());
        if slot >= len {
            return Err(DuelError::IndexOutOfRange { index: slot, len });
        }
        self.start();

        let p_card = &self.player.hand[slot];
        let e_card = &self.enemy.hand[slot];
        let p_hit = mirror_damage(p_card, e_card, self.table);
        let e_hit = mirror_damage(e_card, p_card, self.table);
        let strike = |card: &DuelCard, damage: u32, multiplier: f64| MirrorStrike {
            card_id: card.card_id.clone(),
            element: card.element,
            power: card.power,
            damage,
            multiplier,
        };
        let player_strike = strike(p_card, p_hit.damage, p_hit.multiplier);
        let enemy_strike = strike(e_card, e_hit.damage, e_hit.multiplier);

        self.enemy.hp = self.enemy.hp.saturating_sub(p_hit.damage);
        self.player.hp = self.player.hp.saturating_sub(e_hit.damage);

        let played_turn = self.turn;
        self.turn += 1;
        let refill = self.player.draw_unique(slot);
        self.player.hand[slot] = refill;
        let refill = self.enemy.draw_unique(slot);
        self.enemy.hand[slot] = refill;

        if self.player.hp == 0 || self.enemy.hp == 0 {
            let result = DuelOutcome::by_hp(self.player.hp, self.enemy.hp);
            self.outcome = Some(result);
            info!(
                result = %result,
                turns = played_turn,
                player_hp = self.player.hp,
                enemy_hp = self.enemy.hp,
                "mirror duel finished"
            );
        }

        let record = MirrorTurn {
            turn: played_turn,
            slot,
            player: player_strike,
            enemy: enemy_strike,
            finished: self.is_finished(),
        };
        self.log.push_back(record.clone());
        while self.log.len() > self.log_cap {
            self.log.pop_front();
        }
        Ok(record)
    }

    /// Plays a uniformly random slot.
    pub fn play_random_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MirrorTurn> {
        let len = self.hand_size().max(1);
        self.play_turn(rng.gen_range(0..len))
    }

    pub fn summary(&self) -> DuelSummary {
        let phase = if self.is_finished() {
            DuelPhase::DuelEnd
        } else if self.started {
            DuelPhase::PlayerTurn
        } else {
            DuelPhase::Init
        };
        DuelSummary {
            mode: DuelMode::Mirror,
            phase,
            rounds_played: self.turn - 1,
            player_hp: self.player.hp,
            player_max_hp: self.player.max_hp,
            enemy_hp: self.enemy.hp,
            enemy_max_hp: self.enemy.max_hp,
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn deck(prefix: &str, element: Element, power: u32) -> Vec<DuelCard> {
        (0..9)
            .map(|i| DuelCard::new(&format!("{prefix}{i}"), element, power, 0))
            .collect()
    }

    #[test]
    fn test_hp_is_total_power() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let d = MirrorHandDuel::new(deck("p", Element::Fire, 10), deck("e", Element::Water, 20), &mut rng)
            .expect("duel");
        assert_eq!(d.player().hp, 90);
        assert_eq!(d.enemy().max_hp, 180);
        assert_eq!(d.hand_size(), 3);
    }

    #[test]
    fn test_initial_hand_is_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut player = deck("p", Element::Fire, 10);
        player[1].card_id = "p0".to_string();
        player[2].card_id = "p0".to_string();
        let d = MirrorHandDuel::new(player, deck("e", Element::Fire, 10), &mut rng).expect("duel");
        let ids: Vec<&str> = d.player().hand.iter().map(|c| c.card_id.as_str()).collect();
        for (i, id) in ids.iter().enumerate() {
            assert!(!ids[i + 1..].contains(id), "duplicate {id} in {ids:?}");
        }
    }

    #[test]
    fn test_draw_falls_back_when_no_unique_card() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let same: Vec<DuelCard> = (0..9).map(|_| DuelCard::new("x", Element::Fire, 1, 0)).collect();
        let d = MirrorHandDuel::new(same.clone(), same, &mut rng).expect("duel");
        assert_eq!(d.player().hand.len(), 3);
        assert!(d.player().hand.iter().all(|c| c.card_id == "x"));
    }

    #[test]
    fn test_turn_damages_both_sides_with_steampunk_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut d = MirrorHandDuel::new(deck("p", Element::Fire, 10), deck("e", Element::Air, 10), &mut rng)
            .expect("duel");
        let turn = d.play_turn(1).expect("turn");
        assert_eq!(turn.player.damage, 15);
        assert_eq!(turn.enemy.damage, 5);
        assert_eq!(d.player().hp, 85);
        assert_eq!(d.enemy().hp, 75);
        assert_eq!(d.turn(), 2);
        assert_eq!(turn.turn, 1);
    }

    #[test]
    fn test_duel_ends_and_rejects_further_turns() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut d = MirrorHandDuel::new(deck("p", Element::Water, 30), deck("e", Element::Fire, 10), &mut rng)
            .expect("duel");
        while !d.is_finished() {
            d.play_random_turn(&mut rng).expect("turn");
        }
        assert_eq!(d.outcome(), Some(DuelOutcome::Victory));
        assert_eq!(d.enemy().hp, 0);
        assert!(d.last_turn().is_some_and(|t| t.finished));
        assert!(matches!(d.play_turn(0), Err(DuelError::InvalidTransition { .. })));
    }

    #[test]
    fn test_log_keeps_most_recent_entries() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let config = DuelConfig {
            log_cap: 3,
            ..DuelConfig::default()
        };
        let mut d = MirrorHandDuel::with_config(
            deck("p", Element::Fire, 1),
            deck("e", Element::Fire, 1),
            &config,
            &mut rng,
        )
        .expect("duel");
        for _ in 0..5 {
            d.play_turn(0).expect("turn");
        }
        let turns: Vec<u32> = d.log().map(|t| t.turn).collect();
        assert_eq!(turns, vec![3, 4, 5]);
        assert_eq!(d.player().hp, 4);
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut d = MirrorHandDuel::new(deck("p", Element::Fire, 1), deck("e", Element::Fire, 1), &mut rng)
            .expect("duel");
        assert_eq!(d.play_turn(3), Err(DuelError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_empty_deck_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let result = MirrorHandDuel::new(deck("p", Element::Fire, 1), Vec::new(), &mut rng);
        assert!(matches!(result, Err(DuelError::EmptyDeck { side: DuelSide::Enemy })));
    }
}
