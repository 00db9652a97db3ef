use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dpsmeter")]
#[command(version)]
#[command(about = "Live damage-per-second meter for game combat logs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Follow the newest combat log and show live figures
    Watch {
        /// Directory to search for combat logs
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Watch this file only, no discovery
        #[arg(short, long, conflicts_with = "dir")]
        file: Option<PathBuf>,

        /// Config file (defaults to the platform config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Emit one JSON object per tick instead of a status line
        #[arg(long)]
        json: bool,
    },

    /// Summarize a finished combat log
    Summary {
        file: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Per-ability damage of a log or one of its sessions
    Breakdown {
        file: PathBuf,

        /// Session label, e.g. "Boss (2)"
        #[arg(short, long)]
        session: Option<String>,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_version() {
        let cli = Cli::try_parse_from(["dpsmeter", "version"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Version));
    }

    #[test]
    fn test_cli_parse_watch_defaults() {
        let cli = Cli::try_parse_from(["dpsmeter", "watch"]).unwrap();
        if let Commands::Watch {
            dir,
            file,
            config,
            json,
        } = cli.command
        {
            assert!(dir.is_none());
            assert!(file.is_none());
            assert!(config.is_none());
            assert!(!json);
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_cli_parse_watch_file() {
        let cli =
            Cli::try_parse_from(["dpsmeter", "watch", "--file", "CombatLog.txt", "--json"]).unwrap();
        if let Commands::Watch { file, json, .. } = cli.command {
            assert_eq!(file, Some(PathBuf::from("CombatLog.txt")));
            assert!(json);
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_cli_watch_dir_and_file_conflict() {
        let cli = Cli::try_parse_from(["dpsmeter", "watch", "--dir", "logs", "--file", "a.txt"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_breakdown_session() {
        let cli =
            Cli::try_parse_from(["dpsmeter", "breakdown", "log.txt", "--session", "Boss (2)"])
                .unwrap();
        if let Commands::Breakdown { file, session, .. } = cli.command {
            assert_eq!(file, PathBuf::from("log.txt"));
            assert_eq!(session.as_deref(), Some("Boss (2)"));
        } else {
            panic!("Expected Breakdown command");
        }
    }

    #[test]
    fn test_cli_summary_requires_file() {
        assert!(Cli::try_parse_from(["dpsmeter", "summary"]).is_err());
    }
}
