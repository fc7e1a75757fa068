mod app;
mod editor;
mod preview;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use papier_config::Config;
use papier_engine::{DocumentStore, FileStore};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

use crate::app::App;

fn main() -> Result<()> {
    // Determine store path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let mut config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            // First run: write the defaults so there is a file to edit
            let config = Config::default();
            if let Err(e) = config.save() {
                eprintln!(
                    "Warning: could not write default config to {}: {e}",
                    config_path.display()
                );
            }
            config
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} [store-file-path]", args[0]);
            process::exit(1);
        }
    };

    match args.len() {
        1 => {}
        2 => config.store_path = PathBuf::from(&args[1]),
        _ => {
            eprintln!("Usage: {} [store-file-path]", args[0]);
            eprintln!("Or set store_path in {}", config_path.display());
            process::exit(1);
        }
    }

    init_logging(&config)?;
    log::info!("papier starting with store {}", config.store_path.display());

    let store = match FileStore::open(&config.store_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let mut app = App::new(store, config.owner_id.clone())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("papier exited with error: {err:?}");
        println!("{err:?}");
    }

    Ok(())
}

/// The terminal UI owns stderr, so logs only go to a configured file
fn init_logging(config: &Config) -> Result<()> {
    let Some(log_file) = &config.log_file else {
        return Ok(());
    };

    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_app<S: DocumentStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }
    Ok(())
}
