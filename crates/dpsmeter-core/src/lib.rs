//! Combat log data model, DPS math and combat session tracking

mod breakdown;
mod calculator;
mod config;
mod labels;
mod replay;
mod tracker;
mod types;

pub use breakdown::{ability_breakdown, AbilityDamage};
pub use calculator::{
    active_seconds, calculate_dps, format_time_span, gap_seconds, seconds, Calculator,
};
pub use config::{Config, ConfigError, FormatConfig};
pub use labels::{next_session_label, opponent_name, UNKNOWN_OPPONENT};
pub use replay::replay_sessions;
pub use tracker::{CombatTracker, TrackerUpdate};
pub use types::{CombatData, CombatEntry, CombatSession, DisplayData, LastCombat};
