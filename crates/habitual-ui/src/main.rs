use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use habitual_core::config::{
    AppConfig, DEFAULT_API_URL, DEFAULT_HEALTH_URL, DEFAULT_REQUEST_TIMEOUT_MS,
};
use habitual_service::{HabitService, HttpService};
use habitual_ui::app::App;
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "habitual", about = "Habit tracker client")]
struct Cli {
    /// Base URL of the habit API
    #[arg(long, env = "HABITUAL_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// URL probed for backend liveness
    #[arg(long, env = "HABITUAL_HEALTH_URL", default_value = DEFAULT_HEALTH_URL)]
    health_url: String,

    /// Per-request timeout (milliseconds)
    #[arg(long, env = "HABITUAL_TIMEOUT_MS", default_value_t = DEFAULT_REQUEST_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Directory export files are written to
    #[arg(long, env = "HABITUAL_EXPORT_DIR", default_value = ".")]
    export_dir: PathBuf,

    /// Write logs here. The dashboard logs nowhere otherwise.
    #[arg(long, env = "HABITUAL_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Probe the backend once; exit status 0 when online
    Check,
    /// Load everything and write a JSON export
    Export,
    /// Load everything and write a static HTML dashboard
    Render {
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the effective configuration as JSON
    Config,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            api_url: self.api_url.clone(),
            health_url: self.health_url.clone(),
            request_timeout_ms: self.timeout_ms,
            export_dir: self.export_dir.clone(),
            ..AppConfig::default()
        }
    }
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match (&cli.log_file, &cli.command) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Terminal output would corrupt the dashboard.
        (None, None) => {}
        (None, Some(_)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let config = cli.app_config();
    let service: Arc<dyn HabitService> = Arc::new(HttpService::from_config(&config));
    info!("api: {}", config.api_url);

    match cli.command {
        None => {
            run_tui(App::new(service, config)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check) => {
            let online = service.check_health().await;
            println!("{}", if online { "online" } else { "offline" });
            Ok(if online {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Commands::Export) => {
            let mut app = App::new(service, config);
            if !app.boot().await {
                eprintln!("API offline");
                return Ok(ExitCode::FAILURE);
            }
            let path = app.export(Utc::now())?;
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Render { out }) => {
            let mut app = App::new(service, config);
            // Offline still renders: the page then shows the offline state.
            app.boot().await;
            fs::write(&out, app.render_html())
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("{}", out.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_tui(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    if let Some(handle) = app.shutdown() {
        let _ = handle.await;
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    terminal.draw(|frame| app.render(frame))?;
    app.boot().await;
    app.start_health_monitor();

    loop {
        app.process_events();
        app.tick(Instant::now());
        terminal.draw(|frame| app.render(frame))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless we're in an input mode
            if key.code == KeyCode::Char('q') && !app.is_input_mode() {
                break;
            }
            app.handle_key(key).await;
        }
    }

    Ok(())
}
