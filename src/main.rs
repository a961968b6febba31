use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use workout_core::app::AppState;
use workout_core::key_event::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use workout_core::{ui, Catalog};

const CONFIG_DIR: &str = ".config/workout-planner";
const BUILTIN_LABEL: &str = "built-in";

// ── Event conversion ─────────────────────────────────────────────────────

fn convert_key(key: crossterm::event::KeyEvent) -> AppKeyEvent {
    let code = match key.code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::Esc => AppKeyCode::Esc,
        _ => AppKeyCode::Other,
    };
    AppKeyEvent {
        code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    }
}

fn convert_mouse(mouse: crossterm::event::MouseEvent) -> AppMouseEvent {
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::Up(MouseButton::Left) => AppMouseKind::LeftUp,
        MouseEventKind::Drag(MouseButton::Left) => AppMouseKind::Drag,
        _ => AppMouseKind::Other,
    };
    AppMouseEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
    }
}

// ── Config ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CliConfig {
    #[serde(default)]
    catalog: Option<PathBuf>,
    #[serde(default)]
    log_file: Option<PathBuf>,
}

fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set; please set HOME")?;
    Ok(Path::new(&home).join(CONFIG_DIR))
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Missing or unreadable config falls back to defaults.
fn load_config() -> CliConfig {
    let Ok(path) = config_path() else {
        return CliConfig::default();
    };
    fs::read_to_string(&path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
        .unwrap_or_default()
}

fn persist_config(args: &Args, current: &CliConfig) -> Result<PathBuf> {
    let path = config_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let catalog = match &args.catalog {
        Some(path) => Some(
            fs::canonicalize(path)
                .with_context(|| format!("Failed to resolve {}", path.display()))?,
        ),
        None => current.catalog.clone(),
    };
    let log_file = match &args.log_file {
        Some(path) => Some(std::path::absolute(path)?),
        None => current.log_file.clone(),
    };
    let cfg = CliConfig { catalog, log_file };
    let content = serde_json::to_string_pretty(&cfg)?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn resolve_catalog(args: &Args, config: &CliConfig) -> Result<(Catalog, String)> {
    match args.catalog.as_ref().or(config.catalog.as_ref()) {
        Some(path) => {
            let catalog = Catalog::load(path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))?;
            Ok((catalog, path.display().to_string()))
        }
        None => Ok((Catalog::builtin(), BUILTIN_LABEL.to_string())),
    }
}

fn resolve_log_path(args: &Args, config: &CliConfig) -> Option<PathBuf> {
    args.log_file
        .clone()
        .or_else(|| config.log_file.clone())
        .or_else(|| config_dir().ok().map(|dir| dir.join("workout.log")))
}

// ── Logging ──────────────────────────────────────────────────────────────

/// The terminal is in raw mode while the UI runs, so diagnostics go to a file.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

// ── Main ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "workout-cli", version)]
#[command(about = "Plan a workout from predefined blocks", long_about = None)]
struct Args {
    /// Catalog file with the workout blocks (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Where to write diagnostics (default: ~/.config/workout-planner/workout.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the block catalog and exit
    #[arg(long)]
    list_blocks: bool,

    /// Save --catalog and --log-file to the config file
    #[arg(long)]
    remember: bool,
}

fn print_catalog(catalog: &Catalog) {
    for block in catalog.blocks() {
        println!("{}\t{}", block.id, block.label());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config();
    let (catalog, catalog_label) = resolve_catalog(&args, &config)?;

    if args.remember {
        let path = persist_config(&args, &config)?;
        eprintln!("Saved config to {}", path.display());
    }

    if args.list_blocks {
        print_catalog(&catalog);
        return Ok(());
    }

    if let Some(log_path) = resolve_log_path(&args, &config) {
        init_logging(&log_path)?;
    }
    info!(catalog = %catalog_label, blocks = catalog.len(), "starting workout planner");

    let header = format!(
        "Catalog: {catalog_label} ({} blocks) • click or drag blocks to plan",
        catalog.len()
    );
    let mut app = AppState::new(catalog, catalog_label);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &header);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        terminal::LeaveAlternateScreen,
        event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("{err:#}");
        eprintln!("Error: {err}");
    }
    info!(
        selections = app.aggregator.total_selections(),
        km = app.aggregator.total_km(),
        "workout planner closed"
    );
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    header: &str,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app, header))?;

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(convert_key(key)) {
                        break;
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    app.handle_mouse(convert_mouse(mouse), area);
                }
                _ => {}
            }
        }
    }
    Ok(())
}
