//! Offline session reconstruction from a complete entry list

use crate::calculator::{gap_seconds, seconds};
use crate::config::Config;
use crate::labels::{next_session_label, opponent_name};
use crate::types::{CombatEntry, CombatSession};

/// Split entries into bursts separated by at least the combat pause
/// threshold and label them oldest first.
pub fn replay_sessions(entries: &[CombatEntry], config: &Config) -> Vec<CombatSession> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.timestamp);

    let mut bursts: Vec<Vec<CombatEntry>> = Vec::new();
    for entry in sorted {
        let split = match bursts.last().and_then(|b| b.last()) {
            Some(prev) => seconds(entry.timestamp - prev.timestamp) >= config.combat_pause_threshold_secs,
            None => true,
        };
        if split {
            bursts.push(vec![entry]);
        } else if let Some(current) = bursts.last_mut() {
            current.push(entry);
        }
    }

    let mut sessions: Vec<CombatSession> = Vec::with_capacity(bursts.len());
    for burst in bursts {
        let (Some(first), Some(last)) = (burst.first(), burst.last()) else {
            continue;
        };
        let label = next_session_label(
            &opponent_name(&burst),
            sessions.iter().map(|s| s.label.as_str()),
        );
        let timestamps: Vec<_> = burst.iter().map(|e| e.timestamp).collect();

        sessions.push(CombatSession {
            label,
            damage: burst.iter().fold(0u64, |acc, e| acc.saturating_add(e.damage)),
            start_time: first.timestamp,
            end_time: last.timestamp,
            gap_seconds: gap_seconds(&timestamps, config.gap_threshold_secs),
            entries: burst,
        });
    }

    sessions
}
