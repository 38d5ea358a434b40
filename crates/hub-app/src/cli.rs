use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Project hub: talk to the engine host over its object bridge.
#[derive(Parser, Debug)]
#[command(name = "project-hub", version, about)]
pub struct Args {
    /// Host WebSocket URL (overrides `[bridge] url`).
    #[arg(long)]
    pub url: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `hub_bridge=trace`.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Handshake timeout in milliseconds; 0 waits forever.
    #[arg(long)]
    pub handshake_timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show engine version, recent projects and templates.
    Status,
    /// Ask the host to create a new project.
    Create,
    /// Open a recent project by its position in the list.
    Open { index: usize },
    /// Print property changes and signals until the host goes away.
    Watch,
    /// Print the effective configuration as JSON.
    Config,
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Status)
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_the_default() {
        let args = Args::try_parse_from(["project-hub"]).unwrap();
        assert_eq!(args.command(), Command::Status);
        assert!(args.url.is_none());
    }

    #[test]
    fn open_takes_an_index() {
        let args = Args::try_parse_from(["project-hub", "open", "2"]).unwrap();
        assert_eq!(args.command(), Command::Open { index: 2 });
    }

    #[test]
    fn global_flags_parse() {
        let args = Args::try_parse_from([
            "project-hub",
            "--url",
            "ws://localhost:9000",
            "--handshake-timeout-ms",
            "500",
            "--log-level",
            "debug",
            "watch",
        ])
        .unwrap();
        assert_eq!(args.url.as_deref(), Some("ws://localhost:9000"));
        assert_eq!(args.handshake_timeout_ms, Some(500));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.command(), Command::Watch);
    }

    #[test]
    fn open_rejects_negative_index() {
        assert!(Args::try_parse_from(["project-hub", "open", "-1"]).is_err());
    }
}
