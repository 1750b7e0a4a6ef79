//! Turn-based exchange duel.
//!
//! Each round the player picks a card, the enemy picks one at random, both
//! hit each other and the loser of the exchange takes the damage difference.
//! Played cards leave their decks, so a duel lasts at most nine rounds.

use super::error::{DuelError, Result};
use super::types::{DuelMode, DuelPhase, DuelSide, DuelSummary, LogEntry, RoundReport};
use crate::cards::elements::ElementTable;
use crate::cards::types::DuelCard;
use crate::combat::logic::{check_duel_end, resolve_round, round_message};
use crate::combat::types::{DuelOutcome, RoundWinner};
use crate::core::constants::DEFAULT_STARTING_HP;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct AsymmetricExchangeDuel {
    player_deck: Vec<DuelCard>,
    enemy_deck: Vec<DuelCard>,
    player_hp: u32,
    enemy_hp: u32,
    player_max_hp: u32,
    enemy_max_hp: u32,
    round: u32,
    phase: DuelPhase,
    log: Vec<LogEntry>,
    player_pick: Option<usize>,
    enemy_pick: Option<usize>,
    outcome: Option<DuelOutcome>,
    table: ElementTable,
}

/// Read-only copy of the duel state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeSnapshot {
    pub phase: DuelPhase,
    pub round: u32,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub enemy_hp: u32,
    pub enemy_max_hp: u32,
    pub player_deck_size: usize,
    pub enemy_deck_size: usize,
    pub current_player_card: Option<DuelCard>,
    pub current_enemy_card: Option<DuelCard>,
    pub outcome: Option<DuelOutcome>,
    pub log: Vec<LogEntry>,
}

impl AsymmetricExchangeDuel {
    /// Shuffles both decks. Both sides start at the default HP.
    pub fn new<R: Rng + ?Sized>(player_deck: Vec<DuelCard>, enemy_deck: Vec<DuelCard>, rng: &mut R) -> Self {
        let mut player_deck = player_deck;
        let mut enemy_deck = enemy_deck;
        player_deck.shuffle(rng);
        enemy_deck.shuffle(rng);
        Self {
            player_deck,
            enemy_deck,
            player_hp: DEFAULT_STARTING_HP,
            enemy_hp: DEFAULT_STARTING_HP,
            player_max_hp: DEFAULT_STARTING_HP,
            enemy_max_hp: DEFAULT_STARTING_HP,
            round: 0,
            phase: DuelPhase::Init,
            log: Vec::new(),
            player_pick: None,
            enemy_pick: None,
            outcome: None,
            table: ElementTable::Extended,
        }
    }

    /// Sets starting HP. The enemy mirrors the player unless given its own.
    pub fn with_hp(mut self, player_hp: u32, enemy_hp: Option<u32>) -> Self {
        let enemy_hp = enemy_hp.unwrap_or(player_hp);
        self.player_hp = player_hp;
        self.player_max_hp = player_hp;
        self.enemy_hp = enemy_hp;
        self.enemy_max_hp = enemy_hp;
        self
    }

    pub fn with_table(mut self, table: ElementTable) -> Self {
        self.table = table;
        self
    }

    pub fn phase(&self) -> DuelPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player_hp(&self) -> u32 {
        self.player_hp
    }

    pub fn enemy_hp(&self) -> u32 {
        self.enemy_hp
    }

    pub fn player_deck(&self) -> &[DuelCard] {
        &self.player_deck
    }

    pub fn enemy_deck(&self) -> &[DuelCard] {
        &self.enemy_deck
    }

    pub fn outcome(&self) -> Option<DuelOutcome> {
        self.outcome
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    fn expect_phase(&self, expected: DuelPhase, action: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DuelError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    fn push_log(&mut self, message: String) {
        self.log.push(LogEntry::now(self.round, message));
    }

    pub fn start(&mut self) -> Result<()> {
        self.expect_phase(DuelPhase::Init, "start")?;
        if self.player_deck.is_empty() {
            return Err(DuelError::EmptyDeck { side: DuelSide::Player });
        }
        if self.enemy_deck.is_empty() {
            return Err(DuelError::EmptyDeck { side: DuelSide::Enemy });
        }
        self.phase = DuelPhase::PlayerTurn;
        self.round = 1;
        self.push_log("Duel started!".to_string());
        info!(
            player_hp = self.player_hp,
            enemy_hp = self.enemy_hp,
            "exchange duel started"
        );
        Ok(())
    }

    pub fn select_player_card(&mut self, index: usize) -> Result<()> {
        self.expect_phase(DuelPhase::PlayerTurn, "select a player card")?;
        if index >= self.player_deck.len() {
            return Err(DuelError::IndexOutOfRange {
                index,
                len: self.player_deck.len(),
            });
        }
        self.player_pick = Some(index);
        self.phase = DuelPhase::EnemyTurn;
        Ok(())
    }

    /// Picks uniformly from the remaining enemy deck. Returns the chosen index.
    pub fn select_enemy_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        self.expect_phase(DuelPhase::EnemyTurn, "select an enemy card")?;
        if self.enemy_deck.is_empty() {
            return Err(DuelError::EmptyDeck { side: DuelSide::Enemy });
        }
        let index = rng.gen_range(0..self.enemy_deck.len());
        self.enemy_pick = Some(index);
        self.phase = DuelPhase::Resolving;
        Ok(index)
    }

    pub fn resolve_current_round(&mut self) -> Result<RoundReport> {
        self.expect_phase(DuelPhase::Resolving, "resolve the round")?;
        let (Some(p), Some(e)) = (self.player_pick, self.enemy_pick) else {
            return Err(DuelError::MissingSelection);
        };

        let outcome = resolve_round(&self.player_deck[p], &self.enemy_deck[e], self.table);
        match outcome.winner {
            RoundWinner::Player => self.enemy_hp = self.enemy_hp.saturating_sub(outcome.net_damage),
            RoundWinner::Enemy => self.player_hp = self.player_hp.saturating_sub(outcome.net_damage),
            RoundWinner::Draw => {}
        }
        self.push_log(round_message(&outcome, self.round));
        debug!(
            round = self.round,
            winner = ?outcome.winner,
            net = outcome.net_damage,
            "round resolved"
        );

        self.player_deck.remove(p);
        self.enemy_deck.remove(e);
        self.player_pick = None;
        self.enemy_pick = None;

        let finished = check_duel_end(self.player_hp, self.enemy_hp).or_else(|| {
            (self.player_deck.is_empty() || self.enemy_deck.is_empty())
                .then(|| DuelOutcome::by_hp(self.player_hp, self.enemy_hp))
        });
        match finished {
            Some(result) => {
                self.phase = DuelPhase::DuelEnd;
                self.outcome = Some(result);
                self.push_log(format!("Duel finished! Result: {result}"));
                info!(
                    result = %result,
                    rounds = self.round,
                    player_hp = self.player_hp,
                    enemy_hp = self.enemy_hp,
                    "exchange duel finished"
                );
            }
            None => self.phase = DuelPhase::RoundEnd,
        }

        Ok(RoundReport {
            round: self.round,
            outcome,
            player_hp: self.player_hp,
            enemy_hp: self.enemy_hp,
            duel_ended: self.phase == DuelPhase::DuelEnd,
        })
    }

    pub fn next_round(&mut self) -> Result<()> {
        self.expect_phase(DuelPhase::RoundEnd, "start the next round")?;
        self.round += 1;
        self.phase = DuelPhase::PlayerTurn;
        Ok(())
    }

    /// Drives whatever part of the round is pending: a random player card,
    /// the enemy pick, then resolution.
    pub fn auto_play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RoundReport> {
        if self.phase == DuelPhase::PlayerTurn {
            if self.player_deck.is_empty() {
                return Err(DuelError::EmptyDeck { side: DuelSide::Player });
            }
            let index = rng.gen_range(0..self.player_deck.len());
            self.select_player_card(index)?;
        }
        if self.phase == DuelPhase::EnemyTurn {
            self.select_enemy_card(rng)?;
        }
        self.resolve_current_round()
    }

    pub fn snapshot(&self) -> ExchangeSnapshot {
        ExchangeSnapshot {
            phase: self.phase,
            round: self.round,
            player_hp: self.player_hp,
            player_max_hp: self.player_max_hp,
            enemy_hp: self.enemy_hp,
            enemy_max_hp: self.enemy_max_hp,
            player_deck_size: self.player_deck.len(),
            enemy_deck_size: self.enemy_deck.len(),
            current_player_card: self.player_pick.map(|i| self.player_deck[i].clone()),
            current_enemy_card: self.enemy_pick.map(|i| self.enemy_deck[i].clone()),
            outcome: self.outcome,
            log: self.log.clone(),
        }
    }

    pub fn summary(&self) -> DuelSummary {
        let rounds_played = match self.phase {
            DuelPhase::RoundEnd | DuelPhase::DuelEnd => self.round,
            _ => self.round.saturating_sub(1),
        };
        DuelSummary {
            mode: DuelMode::Exchange,
            phase: self.phase,
            rounds_played,
            player_hp: self.player_hp,
            player_max_hp: self.player_max_hp,
            enemy_hp: self.enemy_hp,
            enemy_max_hp: self.enemy_max_hp,
            outcome: self.outcome,
        }
    }
}
