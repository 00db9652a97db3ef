//! Opponent labels for archived sessions

use crate::types::CombatEntry;
use regex::Regex;

/// Label used when no entry names a target
pub const UNKNOWN_OPPONENT: &str = "Unknown";

/// Most frequently hit target. Ties go to the target seen first.
pub fn opponent_name(entries: &[CombatEntry]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for entry in entries {
        if entry.target_name.is_empty() {
            continue;
        }
        match counts
            .iter_mut()
            .find(|(name, _)| *name == entry.target_name)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((&entry.target_name, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for &(name, count) in &counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((name, count));
        }
    }

    best.map_or_else(|| UNKNOWN_OPPONENT.to_string(), |(name, _)| name.to_string())
}

/// `"<opponent> (<n>)"` where `n` is one past the highest ordinal already
/// used for this opponent in `existing`
pub fn next_session_label<'a, I>(opponent: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = match Regex::new(&format!(r"^{}\s*\((\d+)\)$", regex::escape(opponent))) {
        Ok(pattern) => existing
            .into_iter()
            .filter_map(|label| pattern.captures(label)?.get(1)?.as_str().parse::<u32>().ok())
            .max()
            .unwrap_or(0),
        Err(err) => {
            tracing::warn!("Failed to build label pattern for {opponent:?}: {err}");
            0
        }
    };

    format!("{opponent} ({})", highest.saturating_add(1))
}
