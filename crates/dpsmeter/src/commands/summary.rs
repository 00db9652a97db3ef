use crate::settings;
use dpsmeter_core::{replay_sessions, Calculator, CombatData, Config, DisplayData};
use dpsmeter_log::LogParser;
use dpsmeter_meter::{LAST_COMBAT_VIEW, OVERALL_VIEW};
use std::path::Path;

pub fn run(file: &Path, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = settings::load_config(config_path);
    let data = LogParser::new(&config).parse_file(file)?;

    let output = summarize(&data, &config);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn view(calc: &Calculator, label: &str, display: DisplayData) -> serde_json::Value {
    serde_json::json!({
        "label": label,
        "damage": display.damage,
        "damage_text": calc.format_number(display.damage),
        "dps": calc.format_dps(display.dps),
        "duration": calc.format_time_span(display.duration),
    })
}

/// Overall figures, the final burst and every burst newest first
pub fn summarize(data: &CombatData, config: &Config) -> serde_json::Value {
    let calc = Calculator::new(config);
    let sessions = replay_sessions(&data.entries, config);

    let overall = match (data.first_action_time, data.last_action_time) {
        (Some(first), Some(last)) => {
            DisplayData::from_window(data.total_damage, first, last, data.overall_gap_seconds)
        }
        _ => DisplayData::empty(data.total_damage),
    };
    let last_combat = sessions
        .last()
        .map_or_else(|| DisplayData::empty(0), |s| s.display_data());

    serde_json::json!({
        "lines": data.line_count,
        "hits": data.entries.len(),
        "overall": view(&calc, OVERALL_VIEW, overall),
        "last_combat": view(&calc, LAST_COMBAT_VIEW, last_combat),
        "sessions": sessions
            .iter()
            .rev()
            .map(|s| view(&calc, &s.label, s.display_data()))
            .collect::<Vec<_>>(),
    })
}
