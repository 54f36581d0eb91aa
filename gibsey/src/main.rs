//! Gibsey terminal reader.
//!
//! Browse chapters and characters, read pages as they type themselves out,
//! ask characters questions, and keep a vault of saved pages.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting:
//!
//! ```bash
//! echo "#character 2" | cargo run -p gibsey -- --headless
//! ```

mod app;
mod draft;
mod events;
mod headless;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gibsey_core::{Catalog, InteractionController, PageLibrary, ReaderConfig, RevealTick, TokioTicker};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use events::{handle_event, EventResult};
use headless::HeadlessSession;
use ui::render::render;

const LOG_FILE: &str = "gibsey.log";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // The TUI owns the terminal, so logs only go to a file.
    let _log_guard = init_logging();

    let config = apply_args(ReaderConfig::from_env()?, &args);
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path).await?,
        None => Catalog::gibsey(),
    };
    let pages = match &config.pages_path {
        Some(path) => PageLibrary::load(path).await?,
        None => PageLibrary::new(),
    };
    info!(
        chapters = catalog.chapters().len(),
        characters = catalog.characters().len(),
        pages = pages.len(),
        "content loaded"
    );

    let (ticker, ticks) = TokioTicker::channel();
    let controller =
        InteractionController::new(Arc::new(catalog), Arc::new(pages), &config, Box::new(ticker));

    if args.iter().any(|a| a == "--headless") {
        let session = HeadlessSession::new(controller, ticks);
        return headless::run_headless(session).await.map_err(|e| e.into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(controller), ticks).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn init_logging() -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    guard
}

/// Command-line flags override environment configuration.
fn apply_args(mut config: ReaderConfig, args: &[String]) -> ReaderConfig {
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" => {
                if let Some(path) = args.get(i + 1) {
                    config = config.with_catalog_path(PathBuf::from(path));
                    i += 1;
                }
            }
            "--pages" => {
                if let Some(path) = args.get(i + 1) {
                    config = config.with_pages_path(PathBuf::from(path));
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    config
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    mut ticks: UnboundedReceiver<RevealTick>,
) -> io::Result<()> {
    loop {
        // Apply every reveal tick that arrived since the last frame
        while let Ok(tick) = ticks.try_recv() {
            app.on_tick(tick);
        }

        terminal.draw(|f| render(f, &app))?;

        // Short poll so the reveal animates smoothly
        if event::poll(Duration::from_millis(15))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Gibsey - terminal reader");
    println!();
    println!("USAGE:");
    println!("  gibsey [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help          Show this help message");
    println!("  --headless          Run in headless mode (line protocol, no TUI)");
    println!("  --catalog <PATH>    Load chapters and characters from a JSON file");
    println!("  --pages <PATH>      Load book pages from a text file (pages split by ===)");
    println!();
    println!("ENVIRONMENT:");
    println!("  GIBSEY_TICK_MS        Delay between revealed characters (default 30)");
    println!("  GIBSEY_THEME_POLICY   most-recent, character-first, or chapter-first");
    println!("  GIBSEY_DEFAULT_COLOR  Theme color with nothing selected (default #33FF33)");
    println!("  GIBSEY_SCROLL_STEP    Scroll hint size (default 40)");
    println!("  GIBSEY_CATALOG        Same as --catalog");
    println!("  GIBSEY_PAGES          Same as --pages");
    println!("  RUST_LOG              Log filter for {LOG_FILE} (default info)");
    println!();
    println!("EXAMPLES:");
    println!("  gibsey                              # Interactive TUI mode");
    println!("  gibsey --pages book.txt             # Read a book");
    println!("  gibsey --headless < script.txt      # Scripted session");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flags_override_config() {
        let config = ReaderConfig::default().with_pages_path("env.txt");
        let config = apply_args(
            config,
            &args(&["gibsey", "--pages", "book.txt", "--catalog", "cat.json"]),
        );
        assert_eq!(config.pages_path, Some(PathBuf::from("book.txt")));
        assert_eq!(config.catalog_path, Some(PathBuf::from("cat.json")));
    }

    #[test]
    fn test_dangling_flag_is_ignored() {
        let config = apply_args(ReaderConfig::default(), &args(&["gibsey", "--pages"]));
        assert!(config.pages_path.is_none());
    }
}
