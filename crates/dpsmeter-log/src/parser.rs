//! Incremental combat log parser
//!
//! Data lines are comma separated:
//!
//! ```text
//! {timestamp},DamageDone,{ability},{server tick},{damage},{crit},{heavy},{descriptor},{player},{target}
//! ```
//!
//! Only the first five columns are required. Every parse re-reads the whole
//! file; entries on lines at or beyond the cursor recorded by the previous
//! parse are also folded into [`CombatData::last_combat`].

use crate::io::{FileSource, LogSource};
use crate::timestamp::parse_timestamp;
use dpsmeter_core::{gap_seconds, CombatData, CombatEntry, Config};
use std::path::Path;

/// Prefix of version header lines
pub const VERSION_HEADER: &str = "CombatLogVersion";

/// The only record type consumed
pub const DAMAGE_DONE: &str = "DamageDone";

const MIN_FIELDS: usize = 5;

mod column {
    pub const TIMESTAMP: usize = 0;
    pub const RECORD_TYPE: usize = 1;
    pub const ABILITY_NAME: usize = 2;
    pub const DAMAGE: usize = 4;
    pub const IS_CRIT: usize = 5;
    pub const IS_HEAVY: usize = 6;
    pub const CALCULATION_DESCRIPTOR: usize = 7;
    pub const PLAYER_NAME: usize = 8;
    pub const TARGET_NAME: usize = 9;
}

/// The log could not be read this tick
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("combat log {path} is unavailable: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single line produced no entry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("expected at least 5 fields, found {0}")]
    TooFewFields(usize),

    #[error("record type {0:?} is not DamageDone")]
    NotDamage(String),

    #[error("invalid damage {0:?}")]
    InvalidDamage(String),

    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),
}

/// Parse one data line into an entry
pub fn parse_line(line: &str) -> Result<CombatEntry, LineError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return Err(LineError::TooFewFields(fields.len()));
    }
    if fields[column::RECORD_TYPE] != DAMAGE_DONE {
        return Err(LineError::NotDamage(fields[column::RECORD_TYPE].to_string()));
    }

    let raw_damage = fields[column::DAMAGE];
    let damage = raw_damage
        .trim()
        .parse::<u64>()
        .map_err(|_| LineError::InvalidDamage(raw_damage.to_string()))?;

    let raw_timestamp = fields[column::TIMESTAMP];
    let timestamp = parse_timestamp(raw_timestamp)
        .ok_or_else(|| LineError::InvalidTimestamp(raw_timestamp.to_string()))?;

    let text = |idx: usize| fields.get(idx).map(|s| s.to_string()).unwrap_or_default();
    let flag = |idx: usize| fields.get(idx).is_some_and(|s| *s == "1");

    Ok(CombatEntry {
        timestamp,
        damage,
        is_crit: flag(column::IS_CRIT),
        is_heavy: flag(column::IS_HEAVY),
        ability_name: text(column::ABILITY_NAME),
        calculation_descriptor: text(column::CALCULATION_DESCRIPTOR),
        player_name: text(column::PLAYER_NAME),
        target_name: text(column::TARGET_NAME),
    })
}

/// Build a snapshot of `content`.
///
/// Lines with index `>= seen_lines` count as new. Blank and header lines are
/// skipped but still occupy an index. The returned snapshot's `line_count`
/// is the cursor for the next call.
pub fn parse_content(content: &str, seen_lines: usize, gap_threshold_secs: f64) -> CombatData {
    let mut data = CombatData::new();
    let mut line_count = 0;

    for (index, line) in content.lines().enumerate() {
        line_count = index + 1;

        if line.trim().is_empty() || line.starts_with(VERSION_HEADER) {
            continue;
        }

        match parse_line(line) {
            Ok(entry) => {
                if index >= seen_lines {
                    data.last_combat.record(&entry);
                }
                data.record(entry);
            }
            Err(err @ (LineError::TooFewFields(_) | LineError::NotDamage(_))) => {
                tracing::trace!("Ignoring line {line_count}: {err}");
            }
            Err(err) => {
                tracing::debug!("Skipping malformed line {line_count}: {err}");
            }
        }
    }

    data.line_count = line_count;
    data.action_timestamps.sort_unstable();
    data.overall_gap_seconds = gap_seconds(&data.action_timestamps, gap_threshold_secs);
    data
}

/// Parser owning the "lines already processed" cursor for one log file
#[derive(Debug, Clone)]
pub struct LogParser {
    cursor: usize,
    gap_threshold_secs: f64,
}

impl LogParser {
    pub fn new(config: &Config) -> Self {
        Self {
            cursor: 0,
            gap_threshold_secs: config.gap_threshold_secs,
        }
    }

    /// Lines processed by the previous parse
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Forget everything seen, e.g. when switching files
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Read and parse `source`, then advance the cursor.
    ///
    /// A read failure leaves the cursor untouched.
    pub fn parse<S: LogSource + ?Sized>(&mut self, source: &S) -> Result<CombatData, ParseError> {
        let content = source
            .read_content()
            .map_err(|source_err| ParseError::Unavailable {
                path: source.name(),
                source: source_err,
            })?;

        let mut data = parse_content(&content, self.cursor, self.gap_threshold_secs);
        if data.line_count < self.cursor {
            tracing::warn!(
                "Combat log {} shrank from {} to {} lines, rescanning",
                source.name(),
                self.cursor,
                data.line_count
            );
            data = parse_content(&content, 0, self.gap_threshold_secs);
            data.rescanned = true;
        }

        self.cursor = data.line_count;
        Ok(data)
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<CombatData, ParseError> {
        self.parse(&FileSource::new(path))
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const SAMPLE: &str = "CombatLogVersion,4\n\
        20240501-20:15:00:000,DamageDone,Slash,1001,120,1,0,Normal,Hero,Boss\n\
        20240501-20:15:01:500,DamageDone,Fireball,1002,300,0,1,Magic,Hero,Boss\n\
        \n\
        20240501-20:15:02,HealDone,Mend,1003,50,0,0,,Hero,Hero\n";

    #[test]
    fn test_parse_line_full() {
        let entry =
            parse_line("20240501-20:15:00:250,DamageDone,Slash,1001,120,1,0,Normal,Hero,Boss")
                .unwrap();
        assert_eq!(entry.damage, 120);
        assert!(entry.is_crit);
        assert!(!entry.is_heavy);
        assert_eq!(entry.ability_name, "Slash");
        assert_eq!(entry.calculation_descriptor, "Normal");
        assert_eq!(entry.player_name, "Hero");
        assert_eq!(entry.target_name, "Boss");
        assert_eq!(entry.timestamp.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_parse_line_optional_columns() {
        let entry = parse_line("20240501-20:15:00,DamageDone,Slash,1001,7").unwrap();
        assert_eq!(entry.damage, 7);
        assert!(!entry.is_crit);
        assert!(!entry.is_heavy);
        assert_eq!(entry.calculation_descriptor, "");
        assert_eq!(entry.target_name, "");
    }

    #[test]
    fn test_parse_line_rejections() {
        assert_eq!(
            parse_line("20240501-20:15:00,DamageDone,Slash"),
            Err(LineError::TooFewFields(3))
        );
        assert_eq!(
            parse_line("20240501-20:15:00,HealDone,Mend,1,5"),
            Err(LineError::NotDamage("HealDone".to_string()))
        );
        assert_eq!(
            parse_line("20240501-20:15:00,DamageDone,Slash,1,-5"),
            Err(LineError::InvalidDamage("-5".to_string()))
        );
        assert_eq!(
            parse_line("yesterday,DamageDone,Slash,1,5"),
            Err(LineError::InvalidTimestamp("yesterday".to_string()))
        );
    }

    #[test]
    fn test_parse_content_counts_all_lines() {
        let data = parse_content(SAMPLE, 0, 10.0);
        assert_eq!(data.line_count, 5);
        assert_eq!(data.entries.len(), 2);
        assert_eq!(data.total_damage, 420);
        assert_eq!(data.last_combat.damage, 420);
        assert_eq!(data.overall_gap_seconds, 0.0);
    }

    #[test]
    fn test_parse_content_respects_seen_lines() {
        // header + first damage line already seen
        let data = parse_content(SAMPLE, 2, 10.0);
        assert_eq!(data.total_damage, 420);
        assert_eq!(data.last_combat.damage, 300);
        assert_eq!(data.last_combat.entries.len(), 1);
        assert_eq!(data.last_combat.entries[0].ability_name, "Fireball");

        let nothing_new = parse_content(SAMPLE, 5, 10.0);
        assert_eq!(nothing_new.last_combat.damage, 0);
        assert!(nothing_new.last_combat.first_time.is_none());
    }

    #[test]
    fn test_malformed_lines_do_not_abort() {
        let content = "20240501-20:15:00,DamageDone,Slash,1,abc,0,0,,Hero,Boss\n\
            garbage\n\
            bad-time,DamageDone,Slash,1,10,0,0,,Hero,Boss\n\
            20240501-20:15:03,DamageDone,Slash,1,10,0,0,,Hero,Boss\n";
        let data = parse_content(content, 0, 10.0);
        assert_eq!(data.entries.len(), 1);
        assert_eq!(data.total_damage, 10);
        assert_eq!(data.line_count, 4);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "CombatLogVersion,4\r\n20240501-20:15:00,DamageDone,Slash,1,10,0,0,,Hero,Boss\r\n";
        let data = parse_content(content, 0, 10.0);
        assert_eq!(data.line_count, 2);
        assert_eq!(data.entries[0].target_name, "Boss");
    }

    #[test]
    fn test_gap_accumulates_full_interval() {
        let content = "20240501-20:15:00,DamageDone,A,1,10\n\
            20240501-20:15:05,DamageDone,A,1,10\n\
            20240501-20:15:20,DamageDone,A,1,10\n\
            20240501-20:15:21,DamageDone,A,1,10\n";
        let data = parse_content(content, 0, 10.0);
        assert_eq!(data.overall_gap_seconds, 15.0);
    }

    #[test]
    fn test_parser_cursor_advances() {
        let mut parser = LogParser::default();
        let first = parser.parse(SAMPLE).unwrap();
        assert_eq!(parser.cursor(), 5);
        assert_eq!(first.last_combat.damage, 420);

        let again = parser.parse(SAMPLE).unwrap();
        assert_eq!(parser.cursor(), 5);
        assert_eq!(again.total_damage, first.total_damage);
        assert_eq!(again.overall_gap_seconds, first.overall_gap_seconds);
        assert_eq!(again.last_combat.damage, 0);

        parser.reset();
        assert_eq!(parser.cursor(), 0);
    }

    #[test]
    fn test_parser_rescans_shrunk_log() {
        let mut parser = LogParser::default();
        parser.parse(SAMPLE).unwrap();

        let data = parser
            .parse("20240501-21:00:00,DamageDone,Slash,1,9,0,0,,Hero,Imp")
            .unwrap();
        assert_eq!(parser.cursor(), 1);
        assert_eq!(data.last_combat.damage, 9);
        assert!(data.rescanned);

        let next = parser
            .parse("20240501-21:00:00,DamageDone,Slash,1,9,0,0,,Hero,Imp")
            .unwrap();
        assert!(!next.rescanned);
    }

    #[test]
    fn test_huge_damage_does_not_overflow() {
        let content = "20240501-20:15:00,DamageDone,Slash,1,18446744073709551615,0,0,,Hero,Boss\n\
            20240501-20:15:01,DamageDone,Slash,2,1,0,0,,Hero,Boss\n";
        let data = parse_content(content, 0, 10.0);
        assert_eq!(data.entries.len(), 2);
        assert_eq!(data.total_damage, u64::MAX);
        assert_eq!(data.last_combat.damage, u64::MAX);
    }

    #[test]
    fn test_parser_unavailable_keeps_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let mut parser = LogParser::default();
        parser.parse(SAMPLE).unwrap();

        let err = parser.parse_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ParseError::Unavailable { .. }));
        assert_eq!(parser.cursor(), 5);
    }
}
