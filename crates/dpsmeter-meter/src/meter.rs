//! One poll-tick of parse, track and publish

use crate::snapshot::{DisplaySnapshot, ViewData, ViewKind, LAST_COMBAT_VIEW, OVERALL_VIEW};
use chrono::NaiveDateTime;
use dpsmeter_core::{ability_breakdown, AbilityDamage, CombatTracker, Config, DisplayData};
use dpsmeter_log::{FileSource, LogDiscovery, LogParser, LogSource};
use std::path::{Path, PathBuf};

/// Whole-file time window, advanced only when new activity shows up
#[derive(Debug, Clone, Default, PartialEq)]
struct OverallWindow {
    first_action_time: Option<NaiveDateTime>,
    last_action_time: Option<NaiveDateTime>,
    gap_seconds: f64,
}

/// Owns all per-file state. Every mutation goes through `&mut self`, so a
/// single owner serializes ticks and file switches.
#[derive(Debug)]
pub struct Meter {
    parser: LogParser,
    tracker: CombatTracker,
    current_file: Option<PathBuf>,
    overall: OverallWindow,
    stale: bool,
}

impl Meter {
    pub fn new(config: &Config) -> Self {
        Self {
            parser: LogParser::new(config),
            tracker: CombatTracker::new(config),
            current_file: None,
            overall: OverallWindow::default(),
            stale: false,
        }
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn tracker(&self) -> &CombatTracker {
        &self.tracker
    }

    /// Follow the discovery collaborator to the newest log.
    ///
    /// Returns `true` when the watched file changed.
    pub fn check_for_new_file(&mut self, discovery: &dyn LogDiscovery) -> bool {
        match discovery.latest_log_file() {
            Some(latest) if self.current_file.as_deref() != Some(latest.as_path()) => {
                tracing::info!("Watching combat log {}", latest.display());
                self.switch_file(Some(latest));
                true
            }
            Some(_) => false,
            None => match self.current_file.take() {
                Some(previous) => {
                    tracing::info!("No combat log found, stopped watching {}", previous.display());
                    self.switch_file(None);
                    true
                }
                None => false,
            },
        }
    }

    /// Reset cursor, counters, history and overall window together
    pub fn switch_file(&mut self, path: Option<PathBuf>) {
        self.parser.reset();
        self.reset_tracking();
        self.stale = false;
        self.current_file = path;
    }

    fn reset_tracking(&mut self) {
        self.tracker.initialize();
        self.tracker.clear_history();
        self.overall = OverallWindow::default();
    }

    /// Tick against the watched file
    pub fn tick(&mut self, now: NaiveDateTime) -> DisplaySnapshot {
        match self.current_file.clone() {
            Some(path) => self.tick_source(&FileSource::new(path), now),
            None => self.snapshot(false),
        }
    }

    /// Parse `source`, feed the tracker and build the frame
    pub fn tick_source<S: LogSource + ?Sized>(
        &mut self,
        source: &S,
        now: NaiveDateTime,
    ) -> DisplaySnapshot {
        let data = match self.parser.parse(source) {
            Ok(data) => data,
            Err(err) => {
                if self.stale {
                    tracing::debug!("{err}");
                } else {
                    tracing::warn!("{err}");
                }
                self.stale = true;
                return self.snapshot(false);
            }
        };
        if self.stale {
            tracing::info!("Combat log {} readable again", source.name());
            self.stale = false;
        }
        // the parser already restarted from line 0; drop everything derived
        // from the old content before feeding the fresh snapshot
        if data.rescanned {
            tracing::info!("Combat log {} was truncated, resetting", source.name());
            self.reset_tracking();
        }

        let update = self.tracker.update(&data, now);
        if update.new_combat_started {
            tracing::debug!("New combat started at {now}");
        }

        if data.last_action_time.is_some() && data.last_action_time > self.overall.last_action_time
        {
            self.overall.last_action_time = data.last_action_time;
            if self.overall.first_action_time.is_none() {
                self.overall.first_action_time = data.first_action_time;
            }
            self.overall.gap_seconds = data.overall_gap_seconds;
        }

        self.snapshot(update.archived.is_some())
    }

    fn view(&self, kind: ViewKind, label: &str, display: DisplayData) -> ViewData {
        let calc = self.tracker.calculator();
        ViewData {
            kind,
            label: label.to_string(),
            damage: display.damage,
            damage_text: calc.format_number(display.damage),
            dps: calc.format_dps(display.dps),
            duration: calc.format_time_span(display.duration),
        }
    }

    /// Current frame without parsing
    pub fn snapshot(&self, just_archived: bool) -> DisplaySnapshot {
        let mut views = vec![self.view(
            ViewKind::LastCombat,
            LAST_COMBAT_VIEW,
            self.tracker.last_combat_display_data(),
        )];

        views.extend(
            self.tracker
                .history()
                .map(|session| self.view(ViewKind::Session, &session.label, session.display_data())),
        );

        views.push(self.view(
            ViewKind::Overall,
            OVERALL_VIEW,
            self.tracker.overall_display_data(
                self.overall.first_action_time,
                self.overall.last_action_time,
                self.overall.gap_seconds,
            ),
        ));

        DisplaySnapshot {
            file_name: self
                .current_file
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            in_combat: self.tracker.is_in_combat(),
            stale: self.stale,
            just_archived,
            current_combat_damage: self.tracker.current_combat_damage(),
            views,
        }
    }

    /// Ability breakdown for a view label
    pub fn breakdown(&self, label: &str) -> Option<Vec<AbilityDamage>> {
        if label == LAST_COMBAT_VIEW {
            return Some(ability_breakdown(self.tracker.last_combat_entries()));
        }
        self.tracker.session_by_label(label).map(|s| s.breakdown())
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_no_file_is_empty_frame() {
        let mut meter = Meter::default();
        let snapshot = meter.tick(at(20, 0, 0));

        assert!(snapshot.file_name.is_none());
        assert!(!snapshot.stale);
        assert_eq!(snapshot.views.len(), 2);
        assert_eq!(snapshot.last_combat().unwrap().damage, 0);
        assert_eq!(snapshot.overall().unwrap().dps, "0.0");
        assert_eq!(snapshot.overall().unwrap().duration, "00:000");
    }

    #[test]
    fn test_tick_in_memory() {
        let mut meter = Meter::default();
        let log = "20240501-20:00:00,DamageDone,Slash,1,1000,0,0,,Hero,Boss\n\
                   20240501-20:00:04,DamageDone,Slash,1,1000,0,0,,Hero,Boss\n";

        let snapshot = meter.tick_source(log, at(20, 0, 5));
        assert!(snapshot.in_combat);
        assert!(!snapshot.just_archived);

        let last = snapshot.last_combat().unwrap();
        assert_eq!(last.damage, 2000);
        assert_eq!(last.damage_text, "2.0k");
        assert_eq!(last.dps, "500.0");
        assert_eq!(last.duration, "04:000");

        let overall = snapshot.overall().unwrap();
        assert_eq!(overall.damage, 2000);
        assert_eq!(overall.dps, "500.0");
    }

    #[test]
    fn test_truncated_log_resets_tracking() {
        let mut meter = Meter::default();
        let old = "20240501-20:00:00,DamageDone,Slash,1,100,0,0,,Hero,Boss\n\
                   20240501-20:00:01,DamageDone,Slash,1,100,0,0,,Hero,Boss\n\
                   20240501-20:00:02,DamageDone,Slash,1,100,0,0,,Hero,Boss\n";
        meter.tick_source(old, at(20, 0, 3));

        let fresh = "20240501-21:00:00,DamageDone,Bite,1,500,0,0,,Hero,Wolf\n\
                     20240501-21:00:05,DamageDone,Bite,1,500,0,0,,Hero,Wolf\n";
        let snapshot = meter.tick_source(fresh, at(21, 0, 6));

        assert!(!snapshot.just_archived);
        assert_eq!(snapshot.sessions().count(), 0);
        assert_eq!(meter.tracker().history_len(), 0);

        let overall = snapshot.overall().unwrap();
        assert_eq!(overall.damage, 1000);
        assert_eq!(overall.duration, "05:000");
        assert_eq!(overall.dps, "200.0");

        let last = snapshot.last_combat().unwrap();
        assert_eq!(last.damage, 1000);
        assert_eq!(meter.breakdown(LAST_COMBAT_VIEW).unwrap()[0].ability_name, "Bite");
    }

    #[test]
    fn test_breakdown_by_view() {
        let mut meter = Meter::default();
        let log = "20240501-20:00:00,DamageDone,Slash,1,10,0,0,,Hero,Boss\n\
                   20240501-20:00:01,DamageDone,Kick,1,30,0,0,,Hero,Boss\n";
        meter.tick_source(log, at(20, 0, 2));

        let rows = meter.breakdown(LAST_COMBAT_VIEW).unwrap();
        assert_eq!(rows[0].ability_name, "Kick");
        assert!(meter.breakdown("Boss (1)").is_none());
    }
}
