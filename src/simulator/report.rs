//! Simulation report generation.

use super::runner::DuelRunStats;
use crate::cards::types::Rarity;
use crate::combat::types::DuelOutcome;
use crate::drops::types::{DropResult, PityCounters};
use crate::duel::types::DuelMode;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from a batch of duels.
#[derive(Debug, Clone, Serialize)]
pub struct DuelReport {
    pub mode: DuelMode,
    pub num_runs: u32,
    pub victories: u32,
    pub defeats: u32,
    pub draws: u32,
    pub timed_out: u32,

    pub avg_rounds: f64,
    pub avg_player_power: f64,
    pub avg_enemy_power: f64,
    pub avg_player_hp_left: f64,
    pub avg_enemy_hp_left: f64,

    // Individual run stats for detailed analysis
    pub runs: Vec<DuelRunStats>,
}

fn average(runs: &[DuelRunStats], f: impl Fn(&DuelRunStats) -> u32) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|r| f(r) as f64).sum::<f64>() / runs.len() as f64
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

impl DuelReport {
    pub fn from_runs(mode: DuelMode, runs: Vec<DuelRunStats>) -> Self {
        let count = |outcome: DuelOutcome| runs.iter().filter(|r| r.outcome == Some(outcome)).count() as u32;

        Self {
            mode,
            num_runs: runs.len() as u32,
            victories: count(DuelOutcome::Victory),
            defeats: count(DuelOutcome::Defeat),
            draws: count(DuelOutcome::Draw),
            timed_out: runs.iter().filter(|r| r.timed_out).count() as u32,
            avg_rounds: average(&runs, |r| r.rounds),
            avg_player_power: average(&runs, |r| r.player_power),
            avg_enemy_power: average(&runs, |r| r.enemy_power),
            avg_player_hp_left: average(&runs, |r| r.player_hp_left),
            avg_enemy_hp_left: average(&runs, |r| r.enemy_hp_left),
            runs,
        }
    }

    pub fn win_rate(&self) -> f64 {
        percent(self.victories, self.num_runs)
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                      DUEL SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("Mode: {}, {} duels\n\n", self.mode, self.num_runs));

        report.push_str("── OUTCOMES ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Victories:  {:>6} ({:>5.1}%)\n",
            self.victories,
            self.win_rate()
        ));
        report.push_str(&format!(
            "  Defeats:    {:>6} ({:>5.1}%)\n",
            self.defeats,
            percent(self.defeats, self.num_runs)
        ));
        report.push_str(&format!(
            "  Draws:      {:>6} ({:>5.1}%)\n",
            self.draws,
            percent(self.draws, self.num_runs)
        ));
        if self.timed_out > 0 {
            report.push_str(&format!("  Timed out:  {:>6}\n", self.timed_out));
        }
        report.push('\n');

        report.push_str("── AVERAGES ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Rounds:            {:.1}\n", self.avg_rounds));
        report.push_str(&format!(
            "  Deck power:        {:.0} vs {:.0}\n",
            self.avg_player_power, self.avg_enemy_power
        ));
        report.push_str(&format!(
            "  HP left:           {:.1} vs {:.1}\n",
            self.avg_player_hp_left, self.avg_enemy_hp_left
        ));

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Rarity distribution over a run of drops.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DropReport {
    pub trials: u32,
    pub counts: BTreeMap<Rarity, u32>,
    pub starter_grants: u32,
    /// Drops whose rarity came from the pity counters rather than the roll.
    pub forced_drops: u32,
    /// Rolls that found no card to hand out.
    pub empty_drops: u32,
    pub distinct_cards: usize,
    pub final_pity: PityCounters,
}

impl DropReport {
    pub fn new(trials: u32) -> Self {
        Self {
            trials,
            ..Default::default()
        }
    }

    pub fn record(&mut self, result: &DropResult, forced: bool) {
        if result.from_starter_pool {
            self.starter_grants += 1;
            return;
        }
        if let Some(rarity) = result.rarity {
            *self.counts.entry(rarity).or_insert(0) += 1;
        }
        if result.card.is_none() {
            self.empty_drops += 1;
        }
        if forced {
            self.forced_drops += 1;
        }
    }

    /// Drops that went through the rarity roll.
    pub fn rolled(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn share(&self, rarity: Rarity) -> f64 {
        percent(self.counts.get(&rarity).copied().unwrap_or(0), self.rolled())
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                      DROP SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Trials: {} total, {} starter grants, {} rolled\n\n",
            self.trials,
            self.starter_grants,
            self.rolled()
        ));

        report.push_str("── RARITY DISTRIBUTION ───────────────────────────────────────\n");
        for rarity in Rarity::ALL {
            let count = self.counts.get(&rarity).copied().unwrap_or(0);
            report.push_str(&format!(
                "  {} {:<10} {:>7} ({:>5.1}%)\n",
                rarity.id(),
                rarity.name(),
                count,
                self.share(rarity)
            ));
        }
        report.push('\n');

        report.push_str("── PITY ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Forced drops:      {}\n", self.forced_drops));
        report.push_str(&format!(
            "  Final counters:    {} since legendary, {} since mythic\n",
            self.final_pity.no_legendary, self.final_pity.no_mythic
        ));
        if self.empty_drops > 0 {
            report.push_str(&format!("  Empty drops:       {}\n", self.empty_drops));
        }
        report.push_str(&format!("  Distinct cards:    {}\n", self.distinct_cards));

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
