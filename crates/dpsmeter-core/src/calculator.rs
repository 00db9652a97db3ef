//! DPS math, combat-state predicates and display formatting

use crate::config::{Config, FormatConfig};
use chrono::{NaiveDateTime, TimeDelta};

/// Fractional seconds of a time delta, millisecond precision
pub fn seconds(delta: TimeDelta) -> f64 {
    delta.num_milliseconds() as f64 / 1000.0
}

/// Elapsed seconds between `start` and `end` minus excluded gaps
pub fn active_seconds(start: NaiveDateTime, end: NaiveDateTime, gap_seconds: f64) -> f64 {
    seconds(end - start) - gap_seconds
}

/// Damage per active second. Zero whenever active time is not positive.
pub fn calculate_dps(
    damage: u64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    gap_seconds: f64,
) -> f64 {
    let active = active_seconds(start, end, gap_seconds);
    if active > 0.0 {
        damage as f64 / active
    } else {
        0.0
    }
}

/// Sum of every inactivity interval longer than `threshold_secs`.
///
/// Intervals are counted in full, not clipped to the excess over the
/// threshold. Input order does not matter.
pub fn gap_seconds(timestamps: &[NaiveDateTime], threshold_secs: f64) -> f64 {
    if timestamps.len() < 2 {
        return 0.0;
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    sorted
        .windows(2)
        .map(|pair| seconds(pair[1] - pair[0]))
        .filter(|&diff| diff > threshold_secs)
        .sum()
}

/// `[HH:][MM:]SS:mmm`; hours only when non-zero, minutes when hours or
/// minutes are non-zero
pub fn format_time_span(delta: TimeDelta) -> String {
    let total_ms = delta.num_milliseconds().max(0);
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;

    let mut parts = Vec::with_capacity(4);
    if hours > 0 {
        parts.push(format!("{hours:02}"));
    }
    if hours > 0 || minutes > 0 {
        parts.push(format!("{minutes:02}"));
    }
    parts.push(format!("{secs:02}"));
    parts.push(format!("{millis:03}"));
    parts.join(":")
}

/// Insert `,` every three digits of the integer part
fn group_thousands(formatted: &str) -> String {
    let (int_part, rest) = match formatted.find('.') {
        Some(idx) => formatted.split_at(idx),
        None => (formatted, ""),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    grouped.push_str(rest);
    grouped
}

/// Threshold predicates and formatting bound to one configuration
#[derive(Debug, Clone)]
pub struct Calculator {
    pause_threshold_secs: f64,
    gap_threshold_secs: f64,
    formatting: FormatConfig,
}

impl Calculator {
    pub fn new(config: &Config) -> Self {
        Self {
            pause_threshold_secs: config.combat_pause_threshold_secs,
            gap_threshold_secs: config.gap_threshold_secs,
            formatting: config.formatting.clone(),
        }
    }

    fn scaled(&self, value: f64) -> String {
        let scaled = format!("{:.*}", self.formatting.decimals, value / 1000.0);
        format!("{}{}", group_thousands(&scaled), self.formatting.suffix)
    }

    pub fn format_number(&self, number: u64) -> String {
        if number as f64 >= self.formatting.thousand_threshold {
            self.scaled(number as f64)
        } else {
            number.to_string()
        }
    }

    pub fn format_dps(&self, dps: f64) -> String {
        if dps >= self.formatting.thousand_threshold {
            self.scaled(dps)
        } else {
            group_thousands(&format!("{:.*}", self.formatting.decimals, dps))
        }
    }

    pub fn format_time_span(&self, delta: TimeDelta) -> String {
        format_time_span(delta)
    }

    pub fn calculate_dps(
        &self,
        damage: u64,
        start: NaiveDateTime,
        end: NaiveDateTime,
        gap_seconds: f64,
    ) -> f64 {
        calculate_dps(damage, start, end, gap_seconds)
    }

    pub fn gap_seconds(&self, timestamps: &[NaiveDateTime]) -> f64 {
        gap_seconds(timestamps, self.gap_threshold_secs)
    }

    /// Last action happened less than the pause threshold ago
    pub fn is_in_combat(&self, last_action_time: NaiveDateTime, now: NaiveDateTime) -> bool {
        seconds(now - last_action_time) < self.pause_threshold_secs
    }

    /// Out of combat and the silence reached the pause threshold
    pub fn is_new_combat_started(&self, was_in_combat: bool, since_last_action: TimeDelta) -> bool {
        !was_in_combat && seconds(since_last_action) >= self.pause_threshold_secs
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
