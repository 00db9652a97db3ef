//! Per-ability damage breakdown

use crate::types::CombatEntry;
use serde::{Deserialize, Serialize};

/// Damage dealt by a single ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDamage {
    /// 1-based position by damage
    pub rank: usize,
    pub ability_name: String,
    pub damage: u64,
    pub hits: usize,
    pub crits: usize,
    pub heavies: usize,
    /// Share of the breakdown total, 0-100
    pub percentage: f64,
}

/// Group entries by ability, highest damage first. Equal damage keeps the
/// order in which abilities first appear.
pub fn ability_breakdown(entries: &[CombatEntry]) -> Vec<AbilityDamage> {
    let mut rows: Vec<AbilityDamage> = Vec::new();

    for entry in entries {
        let row = match rows
            .iter_mut()
            .position(|r| r.ability_name == entry.ability_name)
        {
            Some(idx) => &mut rows[idx],
            None => {
                rows.push(AbilityDamage {
                    rank: 0,
                    ability_name: entry.ability_name.clone(),
                    damage: 0,
                    hits: 0,
                    crits: 0,
                    heavies: 0,
                    percentage: 0.0,
                });
                let last = rows.len() - 1;
                &mut rows[last]
            }
        };

        row.damage = row.damage.saturating_add(entry.damage);
        row.hits += 1;
        row.crits += usize::from(entry.is_crit);
        row.heavies += usize::from(entry.is_heavy);
    }

    // stable sort keeps first-appearance order for ties
    rows.sort_by(|a, b| b.damage.cmp(&a.damage));

    let total = rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.damage));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
        if total > 0 {
            row.percentage = row.damage as f64 / total as f64 * 100.0;
        }
    }

    rows
}
