//! Combat state machine and bounded session history

use crate::calculator::Calculator;
use crate::config::Config;
use crate::labels::{next_session_label, opponent_name};
use crate::types::{CombatData, CombatEntry, CombatSession, DisplayData};
use chrono::NaiveDateTime;
use std::collections::VecDeque;

/// The latest encounter, still open or just closed
#[derive(Debug, Clone, Default, PartialEq)]
struct PendingCombat {
    damage: u64,
    first_time: Option<NaiveDateTime>,
    last_time: Option<NaiveDateTime>,
    gap_seconds: f64,
    entries: Vec<CombatEntry>,
    archived: bool,
}

/// What a single update changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerUpdate {
    /// A fresh burst followed a long enough silence
    pub new_combat_started: bool,
    /// Label of the session archived during this update
    pub archived: Option<String>,
}

/// Tracks in/out of combat status and archives finished encounters.
///
/// History is newest first and capped at `max_combat_sessions`.
#[derive(Debug)]
pub struct CombatTracker {
    calculator: Calculator,
    max_sessions: usize,
    in_combat: bool,
    combat_start_time: Option<NaiveDateTime>,
    current_combat_damage: u64,
    total_damage: u64,
    pending: PendingCombat,
    history: VecDeque<CombatSession>,
}

impl CombatTracker {
    pub fn new(config: &Config) -> Self {
        Self {
            calculator: Calculator::new(config),
            max_sessions: config.max_combat_sessions,
            in_combat: false,
            combat_start_time: None,
            current_combat_damage: 0,
            total_damage: 0,
            pending: PendingCombat::default(),
            history: VecDeque::new(),
        }
    }

    /// Reset every counter; history is kept
    pub fn initialize(&mut self) {
        self.in_combat = false;
        self.combat_start_time = None;
        self.current_combat_damage = 0;
        self.total_damage = 0;
        self.pending = PendingCombat::default();
    }

    /// Drop all archived sessions. Used when the log file changes.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Feed the latest parse snapshot
    pub fn update(&mut self, data: &CombatData, now: NaiveDateTime) -> TrackerUpdate {
        let mut outcome = TrackerUpdate::default();
        let was_in_combat = self.in_combat;

        match data.last_action_time {
            Some(last_action) => {
                let since_last_action = now - last_action;
                self.in_combat = self.calculator.is_in_combat(last_action, now);

                if self
                    .calculator
                    .is_new_combat_started(was_in_combat, since_last_action)
                {
                    self.combat_start_time = Some(now);
                    self.current_combat_damage = 0;
                    outcome.new_combat_started = true;
                }

                if self.in_combat || last_action == now {
                    let added = data.total_damage.saturating_sub(self.total_damage);
                    if !was_in_combat && added > 0 && self.combat_start_time.is_none() {
                        self.combat_start_time = Some(now);
                    }
                    self.current_combat_damage = self.current_combat_damage.saturating_add(added);
                }
            }
            None => {
                self.in_combat = false;
                self.current_combat_damage = 0;
            }
        }

        self.total_damage = data.total_damage;

        let incoming = &data.last_combat;
        if incoming.damage > 0
            && (incoming.damage != self.pending.damage
                || incoming.first_time != self.pending.first_time)
        {
            outcome.archived = self.save_current_session_to_history();

            self.pending = PendingCombat {
                damage: incoming.damage,
                first_time: incoming.first_time,
                last_time: incoming.last_time,
                gap_seconds: self.calculator.gap_seconds(
                    &incoming
                        .entries
                        .iter()
                        .map(|e| e.timestamp)
                        .collect::<Vec<_>>(),
                ),
                entries: incoming.entries.clone(),
                archived: false,
            };
        }

        outcome
    }

    /// Archive the pending encounter at the head of history.
    ///
    /// Returns the new label, or `None` when there was nothing to archive or
    /// an identical session (same damage and start) is already stored.
    pub fn save_current_session_to_history(&mut self) -> Option<String> {
        let pending = &self.pending;
        if pending.archived || pending.damage == 0 || pending.entries.is_empty() {
            return None;
        }
        let (start_time, end_time) = (pending.first_time?, pending.last_time?);

        if self
            .history
            .iter()
            .any(|s| s.damage == pending.damage && s.start_time == start_time)
        {
            self.pending.archived = true;
            return None;
        }

        let opponent = opponent_name(&pending.entries);
        let label = next_session_label(&opponent, self.history.iter().map(|s| s.label.as_str()));

        let session = CombatSession {
            label: label.clone(),
            damage: pending.damage,
            start_time,
            end_time,
            gap_seconds: pending.gap_seconds,
            entries: pending.entries.clone(),
        };

        tracing::info!(
            label = %session.label,
            damage = session.damage,
            "Archived combat session"
        );

        self.history.push_front(session);
        self.history.truncate(self.max_sessions);
        self.pending.archived = true;

        Some(label)
    }

    /// Damage, DPS and duration of the latest encounter
    pub fn last_combat_display_data(&self) -> DisplayData {
        match (self.pending.first_time, self.pending.last_time) {
            (Some(first), Some(last)) if self.pending.damage > 0 => {
                DisplayData::from_window(self.pending.damage, first, last, self.pending.gap_seconds)
            }
            _ => DisplayData::empty(self.pending.damage),
        }
    }

    /// Whole-file totals; the time window and gaps are tracked by the caller
    pub fn overall_display_data(
        &self,
        first_action_time: Option<NaiveDateTime>,
        last_action_time: Option<NaiveDateTime>,
        overall_gap_seconds: f64,
    ) -> DisplayData {
        match (first_action_time, last_action_time) {
            (Some(first), Some(last)) if self.total_damage > 0 => {
                DisplayData::from_window(self.total_damage, first, last, overall_gap_seconds)
            }
            _ => DisplayData::empty(self.total_damage),
        }
    }

    /// Archived session by its exact label
    pub fn session_by_label(&self, label: &str) -> Option<&CombatSession> {
        self.history.iter().find(|s| s.label == label)
    }

    /// Archived sessions, newest first
    pub fn history(&self) -> impl Iterator<Item = &CombatSession> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn is_in_combat(&self) -> bool {
        self.in_combat
    }

    pub fn combat_start_time(&self) -> Option<NaiveDateTime> {
        self.combat_start_time
    }

    pub fn current_combat_damage(&self) -> u64 {
        self.current_combat_damage
    }

    pub fn total_damage(&self) -> u64 {
        self.total_damage
    }

    /// Entries of the latest encounter
    pub fn last_combat_entries(&self) -> &[CombatEntry] {
        &self.pending.entries
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }
}

impl Default for CombatTracker {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
