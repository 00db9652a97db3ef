//! Publishing display snapshots

use crate::snapshot::DisplaySnapshot;
use std::io::Write;

/// Consumer of the frame published at the end of every tick
pub trait Renderer {
    fn publish(&mut self, snapshot: &DisplaySnapshot) -> std::io::Result<()>;
}

/// One compact status line, written only when it changes
pub struct TerminalRenderer<W: Write> {
    out: W,
    last_line: Option<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_line: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `Label dmg | dps (duration)` segments joined by ` · `
pub fn status_line(snapshot: &DisplaySnapshot) -> String {
    let Some(file_name) = &snapshot.file_name else {
        return "No log file".to_string();
    };

    let mut line = format!("[{file_name}]");
    if snapshot.stale {
        line.push_str(" (stale)");
    }
    line.push(' ');
    line.push_str(if snapshot.in_combat { "IN COMBAT" } else { "idle" });

    let sessions = snapshot.sessions().count();
    for view in [snapshot.last_combat(), snapshot.overall()].into_iter().flatten() {
        line.push_str(&format!(
            " · {} {} | {} ({})",
            view.label, view.damage_text, view.dps, view.duration
        ));
    }
    line.push_str(&format!(" · sessions: {sessions}"));
    if snapshot.just_archived {
        line.push_str(" *");
    }
    line
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn publish(&mut self, snapshot: &DisplaySnapshot) -> std::io::Result<()> {
        let line = status_line(snapshot);
        if self.last_line.as_deref() == Some(line.as_str()) {
            return Ok(());
        }
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        self.last_line = Some(line);
        Ok(())
    }
}

/// Every frame as one JSON object per line
pub struct JsonLinesRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn publish(&mut self, snapshot: &DisplaySnapshot) -> std::io::Result<()> {
        let json = serde_json::to_string(snapshot)?;
        writeln!(self.out, "{json}")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ViewData, ViewKind};

    fn view(kind: ViewKind, label: &str) -> ViewData {
        ViewData {
            kind,
            label: label.to_string(),
            damage: 1500,
            damage_text: "1.5k".to_string(),
            dps: "150.0".to_string(),
            duration: "10:000".to_string(),
        }
    }

    fn frame(just_archived: bool) -> DisplaySnapshot {
        DisplaySnapshot {
            file_name: Some("CombatLog.txt".to_string()),
            in_combat: true,
            stale: false,
            just_archived,
            current_combat_damage: 1500,
            views: vec![
                view(ViewKind::LastCombat, "Last Combat"),
                view(ViewKind::Session, "Boss (1)"),
                view(ViewKind::Overall, "Overall Damage"),
            ],
        }
    }

    #[test]
    fn test_status_line() {
        let line = status_line(&frame(true));
        assert!(line.starts_with("[CombatLog.txt] IN COMBAT"));
        assert!(line.contains("Last Combat 1.5k | 150.0 (10:000)"));
        assert!(line.contains("sessions: 1"));
        assert!(line.ends_with(" *"));
    }

    #[test]
    fn test_terminal_skips_unchanged_frames() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.publish(&frame(false)).unwrap();
        renderer.publish(&frame(false)).unwrap();
        renderer.publish(&frame(true)).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_json_lines() {
        let mut renderer = JsonLinesRenderer::new(Vec::new());
        renderer.publish(&frame(false)).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["file_name"], "CombatLog.txt");
        assert_eq!(value["views"][1]["kind"], "session");
        assert_eq!(value["views"][1]["label"], "Boss (1)");
    }

    #[test]
    fn test_no_file_line() {
        let mut snapshot = frame(false);
        snapshot.file_name = None;
        assert_eq!(status_line(&snapshot), "No log file");
    }
}
