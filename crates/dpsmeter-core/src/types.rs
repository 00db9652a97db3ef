//! Combat log data model

use crate::breakdown::{ability_breakdown, AbilityDamage};
use crate::calculator::{active_seconds, calculate_dps};
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// One parsed `DamageDone` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEntry {
    pub timestamp: NaiveDateTime,
    pub damage: u64,
    pub is_crit: bool,
    pub is_heavy: bool,
    pub ability_name: String,
    pub calculation_descriptor: String,
    pub player_name: String,
    pub target_name: String,
}

/// Aggregate over the lines that appeared after the previous parse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LastCombat {
    pub damage: u64,
    pub first_time: Option<NaiveDateTime>,
    pub last_time: Option<NaiveDateTime>,
    pub entries: Vec<CombatEntry>,
}

impl LastCombat {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold a newly seen entry in
    pub fn record(&mut self, entry: &CombatEntry) {
        self.damage = self.damage.saturating_add(entry.damage);
        if self.first_time.is_none() {
            self.first_time = Some(entry.timestamp);
        }
        self.last_time = Some(entry.timestamp);
        self.entries.push(entry.clone());
    }
}

/// Snapshot of everything parsed from a log file so far.
///
/// `first_action_time` stays `None` until the first entry is parsed; once set,
/// `last_action_time >= first_action_time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatData {
    pub first_action_time: Option<NaiveDateTime>,
    pub last_action_time: Option<NaiveDateTime>,
    /// All entry timestamps, ascending
    pub action_timestamps: Vec<NaiveDateTime>,
    pub entries: Vec<CombatEntry>,
    pub total_damage: u64,
    /// Sum of inactivity gaps longer than the gap threshold
    pub overall_gap_seconds: f64,
    pub last_combat: LastCombat,
    /// Physical lines consumed, blank and header lines included
    pub line_count: usize,
    /// The log shrank since the previous parse and was read from the top
    #[serde(default)]
    pub rescanned: bool,
}

impl CombatData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an accepted entry into the whole-file aggregates
    pub fn record(&mut self, entry: CombatEntry) {
        let ts = entry.timestamp;
        self.total_damage = self.total_damage.saturating_add(entry.damage);
        self.first_action_time = Some(self.first_action_time.map_or(ts, |t| t.min(ts)));
        self.last_action_time = Some(self.last_action_time.map_or(ts, |t| t.max(ts)));
        self.action_timestamps.push(ts);
        self.entries.push(entry);
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// A closed, archived encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSession {
    /// Opponent name plus ordinal, e.g. "Boss (2)"
    pub label: String,
    pub damage: u64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub gap_seconds: f64,
    pub entries: Vec<CombatEntry>,
}

impl CombatSession {
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    pub fn dps(&self) -> f64 {
        calculate_dps(self.damage, self.start_time, self.end_time, self.gap_seconds)
    }

    pub fn display_data(&self) -> DisplayData {
        DisplayData::from_window(self.damage, self.start_time, self.end_time, self.gap_seconds)
    }

    /// Per-ability damage split of this session
    pub fn breakdown(&self) -> Vec<AbilityDamage> {
        ability_breakdown(&self.entries)
    }
}

/// Damage, DPS and duration for one view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayData {
    pub damage: u64,
    pub dps: f64,
    pub duration: TimeDelta,
}

impl DisplayData {
    pub fn empty(damage: u64) -> Self {
        Self {
            damage,
            dps: 0.0,
            duration: TimeDelta::zero(),
        }
    }

    /// Active time is the window minus gaps; when that is not positive both
    /// DPS and duration are zero.
    pub fn from_window(
        damage: u64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        gap_seconds: f64,
    ) -> Self {
        if active_seconds(start, end, gap_seconds) > 0.0 {
            Self {
                damage,
                dps: calculate_dps(damage, start, end, gap_seconds),
                duration: end - start,
            }
        } else {
            Self::empty(damage)
        }
    }
}
