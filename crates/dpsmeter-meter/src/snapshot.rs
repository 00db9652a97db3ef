//! Display-ready view data published every tick

use serde::Serialize;

/// Label of the latest-encounter view
pub const LAST_COMBAT_VIEW: &str = "Last Combat";

/// Label of the whole-file view
pub const OVERALL_VIEW: &str = "Overall Damage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    LastCombat,
    Session,
    Overall,
}

/// One selectable view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewData {
    pub kind: ViewKind,
    pub label: String,
    pub damage: u64,
    /// `damage` formatted for display
    pub damage_text: String,
    pub dps: String,
    pub duration: String,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    /// File name of the watched log, `None` when nothing is being watched
    pub file_name: Option<String>,
    pub in_combat: bool,
    /// The log could not be read; figures are from the last good tick
    pub stale: bool,
    /// A session was archived on this tick
    pub just_archived: bool,
    pub current_combat_damage: u64,
    /// Last combat, archived sessions newest first, then overall
    pub views: Vec<ViewData>,
}

impl DisplaySnapshot {
    pub fn view(&self, label: &str) -> Option<&ViewData> {
        self.views.iter().find(|v| v.label == label)
    }

    pub fn last_combat(&self) -> Option<&ViewData> {
        self.views.iter().find(|v| v.kind == ViewKind::LastCombat)
    }

    pub fn overall(&self) -> Option<&ViewData> {
        self.views.iter().find(|v| v.kind == ViewKind::Overall)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &ViewData> {
        self.views.iter().filter(|v| v.kind == ViewKind::Session)
    }
}
