use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linewatch",
    about = "Terminal dashboard client for smart-factory line status",
    version = "0.2.0"
)]
pub struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seconds between status polls (overrides the config file)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Configuration file path
    #[arg(long, short = 'c')]
    pub config_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log file path (the terminal is owned by the TUI while running)
    #[arg(long, default_value = "linewatch.log")]
    pub log_file: PathBuf,
}

impl Cli {
    /// Get log level as tracing::Level
    pub fn get_tracing_level(&self) -> tracing::Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["linewatch"]);
        assert!(cli.base_url.is_none());
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.get_tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "linewatch",
            "--base-url",
            "http://factory.local:8000",
            "--interval",
            "2",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://factory.local:8000"));
        assert_eq!(cli.interval, Some(2));
        assert_eq!(cli.get_tracing_level(), tracing::Level::DEBUG);
    }
}
