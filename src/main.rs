mod api;
mod app;
mod calculator;
mod cli;
mod config;
mod error;
mod model;
mod poller;
mod tui;
mod ui;

use clap::Parser;
use color_eyre::Result;
use crossterm::event;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use api::FactoryApi;
use app::App;
use cli::Cli;
use config::Config;
use poller::{AppEvent, PollerCommand};
use tui::{restore_terminal, setup_terminal};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Logs go to a file: stdout belongs to the TUI while it runs.
    let log_file = std::fs::File::create(&cli.log_file)?;
    let (writer, _log_guard) = tracing_appender::non_blocking(log_file);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(cli.get_tracing_level().into()),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let config_path = cli
        .config_file
        .clone()
        .unwrap_or_else(|| Path::new(config::CONFIG_FILE).to_path_buf());
    let mut config = Config::load_or_create(&config_path);
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval.max(1);
    }
    info!(
        "polling {} every {}s",
        config.base_url, config.poll_interval_secs
    );

    let (tx_cmd, rx_cmd) = mpsc::unbounded_channel::<PollerCommand>();
    let (tx_evt, rx_evt) = mpsc::unbounded_channel::<AppEvent>();

    let api = FactoryApi::new(&config.base_url);
    let poll_interval = Duration::from_secs(config.poll_interval_secs);
    tokio::spawn(poller::run_poller(api, poll_interval, rx_cmd, tx_evt));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(tx_cmd, rx_evt);

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        let timeout = Duration::from_millis(80);
        if event::poll(timeout)? {
            let ev = event::read()?;
            if app.on_event(ev) {
                break;
            }
        }

        app.poll_async().await;
    }

    restore_terminal(terminal)?;
    Ok(())
}
