// src/main.rs
mod cart;
mod catalog;
mod categories;
mod config;
mod controller;
mod error;
mod input;
mod models;
mod network;
mod present;
mod theme;
mod ui;
mod utils;

use std::{fs, io, path::{Path, PathBuf}, sync::Mutex, time::{Duration, Instant}};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self as term, DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::{runtime::Runtime, sync::mpsc};
use tracing_subscriber::EnvFilter;

use crate::cart::{CartStore, FileStore};
use crate::config::Settings;
use crate::controller::{Event, RenderController};
use crate::network::{CatalogClient, FetchOutcome};
use crate::theme::Theme;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse a product catalog from the terminal")]
struct Args {
    /// Catalog API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// File the cart count is persisted in
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Log file (the terminal is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::new().context("failed to load settings")?;

    let log_path = args.log_file.clone()
        .or_else(|| settings.log_file())
        .unwrap_or_else(crate::config::default_log_path);
    init_logging(&log_path, &settings.log_level)?;

    let api_url = args.api_url.clone().unwrap_or_else(|| settings.api_base_url.clone());
    tracing::info!(api_url = %api_url, "starting storefront");

    let cart = open_cart(args.storage.clone().or_else(|| settings.storage_path()));
    tracing::info!(count = cart.get(), persistent = cart.is_persistent(), "cart ready");
    let mut controller = RenderController::new(cart, settings.toast_duration());

    let rt = Runtime::new()?;
    let client = CatalogClient::new(&api_url, settings.request_timeout())?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    network::spawn_startup_fetches(&rt, &client, tx);

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut controller, &mut rx);

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    rt.shutdown_background();

    if let Err(e) = &result {
        tracing::error!(error = %e, "storefront exited with an error");
    }
    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    controller: &mut RenderController,
    rx: &mut mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<()> {
    let theme = Theme::default();
    let mut view = ui::View::default();

    while controller.is_running() {
        while let Ok(outcome) = rx.try_recv() {
            controller.dispatch(match outcome {
                FetchOutcome::Categories(result) => Event::CategoriesLoaded(result),
                FetchOutcome::Products(result) => Event::ProductsLoaded(result),
            });
        }
        controller.dispatch(Event::Tick(Instant::now()));

        terminal.draw(|f| {
            view = ui::render(f, controller, &theme);
        })?;
        controller.set_columns(view.columns);

        if term::poll(Duration::from_millis(100))? {
            let event = match term::read()? {
                term::Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(key, controller),
                term::Event::Mouse(mouse) => input::handle_mouse(mouse, &view),
                _ => None,
            };
            if let Some(event) = event {
                controller.dispatch(event);
            }
        }
    }
    Ok(())
}

/// File-backed cart, or a session-only one when no location can be found.
fn open_cart(path: Option<PathBuf>) -> CartStore {
    match path.map(Ok).unwrap_or_else(FileStore::default_path) {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "using cart storage");
            CartStore::new(Box::new(FileStore::new(path)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "no cart storage location, keeping count in memory");
            CartStore::in_memory()
        }
    }
}

fn init_logging(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
