// src/main.rs

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

use vanguard_sentinel::config::{AppConfig, ScanConfig};
use vanguard_sentinel::core::models::ScanReport;
use vanguard_sentinel::core::scanner::run_and_report;
use vanguard_sentinel::logging::initialize_logging;
use vanguard_sentinel::server::{self, BackgroundScanLauncher};
use vanguard_sentinel::watcher::LogWatcher;

mod app;
mod ui;

use app::{App, AppState};

/// Vanguard Sentinel - single-target website security checker
#[derive(Parser)]
#[command(name = "vanguard-sentinel", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console: confirm, press Enter, browse the results (default)
    Console,

    /// Run one scan and write the log and HTML report
    Scan {
        /// Target URL, overrides the configuration file
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Serve the authenticated trigger endpoint
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,

        /// Shared secret expected in the `key` form field
        #[arg(long, env = "VANGUARD_SENTINEL_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Watch a server log and scan when suspicious lines appear
    Watch {
        /// Log file to watch, overrides the configuration file
        #[arg(short, long)]
        log: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Console);

    initialize_logging(!matches!(command, Commands::Console))?;
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match command {
        Commands::Console => {
            config.scan.validate()?;
            run_console(config.scan).await
        }
        Commands::Scan { target } => {
            if let Some(target) = target {
                config.scan.target_url = target;
            }
            config.scan.validate()?;
            let report = run_and_report(&config.scan).await?;
            info!(
                sections = report.sections.len(),
                report = %config.scan.html_report.display(),
                "Scan finished."
            );
            Ok(())
        }
        Commands::Serve { host, port, secret } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(secret) = secret {
                config.server.secret_key = secret;
            }
            config.scan.validate()?;
            let launcher = Arc::new(BackgroundScanLauncher::new(config.scan));
            server::serve(&config.server, launcher).await?;
            Ok(())
        }
        Commands::Watch { log } => {
            if let Some(log) = log {
                config.watcher.log_path = log;
            }
            config.scan.validate()?;
            let watcher = LogWatcher::new(config.watcher)?;
            watcher.run(&config.scan).await?;
            Ok(())
        }
    }
}

async fn run_console(scan_config: ScanConfig) -> Result<()> {
    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new(&scan_config.target_url, scan_config.html_report.clone());
    let (tx, mut rx) = mpsc::channel(1);
    let result = console_loop(&mut terminal, &mut app, &scan_config, &tx, &mut rx).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

type ScanOutcome = std::result::Result<ScanReport, String>;

async fn console_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    scan_config: &ScanConfig,
    tx: &mpsc::Sender<ScanOutcome>,
    rx: &mut mpsc::Receiver<ScanOutcome>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app, scan_config, tx)?;
        }
        app.on_tick();

        if let Ok(outcome) = rx.try_recv() {
            app.finish_scan(outcome);
        }
    }
    Ok(())
}

fn handle_events(app: &mut App, scan_config: &ScanConfig, tx: &mpsc::Sender<ScanOutcome>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Disclaimer => match key.code {
                    KeyCode::Enter => app.acknowledge_disclaimer(),
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    _ => {}
                },
                AppState::Idle => handle_idle_input(app, key.code, scan_config, tx)?,
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Scanning => {
                    if key.code == KeyCode::Char('q') {
                        app.quit();
                    }
                }
            }
        }
    }
    Ok(())
}

fn handle_idle_input(
    app: &mut App,
    key_code: KeyCode,
    scan_config: &ScanConfig,
    tx: &mpsc::Sender<ScanOutcome>,
) -> Result<()> {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            let raw_input = app.input.trim();
            if raw_input.is_empty() {
                return Ok(());
            }
            let target = if !raw_input.starts_with("http://") && !raw_input.starts_with("https://") {
                format!("https://{}", raw_input)
            } else {
                raw_input.to_string()
            };

            let config = ScanConfig { target_url: target, ..scan_config.clone() };
            if let Err(e) = config.validate() {
                app.finish_scan(Err(e.to_string()));
                return Ok(());
            }

            app.state = AppState::Scanning;
            let tx_clone = tx.clone();
            tokio::spawn(async move {
                let outcome = run_and_report(&config).await.map_err(|e| {
                    error!(error = %e, "Console scan failed.");
                    e.to_string()
                });
                if tx_clone.send(outcome).await.is_err() {
                    error!("Console closed before the scan finished.");
                }
            });
        }
        _ => {}
    }
    Ok(())
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        _ => {}
    }
}

