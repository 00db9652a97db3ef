use crate::settings;
use dpsmeter_core::{ability_breakdown, replay_sessions, AbilityDamage, Calculator};
use dpsmeter_log::LogParser;
use std::path::Path;

pub fn run(file: &Path, session: Option<&str>, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = settings::load_config(config_path);
    let data = LogParser::new(&config).parse_file(file)?;

    let rows = match session {
        Some(label) => {
            let sessions = replay_sessions(&data.entries, &config);
            let Some(found) = sessions.iter().find(|s| s.label == label) else {
                let known: Vec<&str> = sessions.iter().map(|s| s.label.as_str()).collect();
                anyhow::bail!("No session {label:?}, found: {}", known.join(", "));
            };
            found.breakdown()
        }
        None => ability_breakdown(&data.entries),
    };

    print!("{}", render_table(&rows, &Calculator::new(&config)));
    Ok(())
}

pub fn render_table(rows: &[AbilityDamage], calc: &Calculator) -> String {
    if rows.is_empty() {
        return "No damage recorded\n".to_string();
    }

    let width = rows
        .iter()
        .map(|r| r.ability_name.len())
        .max()
        .unwrap_or(0)
        .max("Ability".len());

    let mut out = format!(
        "{:>3}  {:<width$}  {:>10}  {:>6}  {:>5}  {:>5}  {:>6}\n",
        "#", "Ability", "Damage", "Share", "Hits", "Crits", "Heavy"
    );
    for row in rows {
        out.push_str(&format!(
            "{:>3}  {:<width$}  {:>10}  {:>5.1}%  {:>5}  {:>5}  {:>6}\n",
            row.rank,
            row.ability_name,
            calc.format_number(row.damage),
            row.percentage,
            row.hits,
            row.crits,
            row.heavies
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rank: usize, name: &str, damage: u64, percentage: f64) -> AbilityDamage {
        AbilityDamage {
            rank,
            ability_name: name.to_string(),
            damage,
            hits: 2,
            crits: 1,
            heavies: 0,
            percentage,
        }
    }

    #[test]
    fn test_render_table() {
        let rows = vec![row(1, "Fireball", 3000, 75.0), row(2, "Slash", 1000, 25.0)];
        let table = render_table(&rows, &Calculator::default());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Ability"));
        assert!(lines[1].contains("Fireball"));
        assert!(lines[1].contains("3.0k"));
        assert!(lines[1].contains("75.0%"));
        assert!(lines[2].contains("25.0%"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render_table(&[], &Calculator::default()),
            "No damage recorded\n"
        );
    }
}
