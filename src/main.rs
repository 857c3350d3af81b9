// main.rs

mod app;
mod avatar;
mod config;
mod dates;
mod engine;
mod filter;
mod models;
mod parser;
mod rules;
mod store;
mod ui;

use crate::app::App;
use crate::config::Config;
use crate::rules::Rules;
use crate::store::Store;
use chrono::Local;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

// Logs go to a file next to the saved user record so the terminal stays
// free for the UI.
fn init_logging(dir: &Path) {
    let _ = fs::create_dir_all(dir);
    let Ok(file) = File::options()
        .create(true)
        .append(true)
        .open(dir.join("coindo.log"))
    else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let path = Store::default_path(config.data_dir.as_deref());
    if let Some(parent) = path.parent() {
        init_logging(parent);
    }

    let store = Store::new(path);
    let mut user = store.load(Local::now());
    if let Some(name) = config.user_name {
        user.name = name;
    }

    // Setup terminal UI
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let app = App::new(user, Rules::new(), store);

    let res = ui::run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
