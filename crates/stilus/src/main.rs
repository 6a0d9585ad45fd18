mod app;
mod command_processor;
mod config;
mod file_manager;
mod highlight;
mod ui;
mod ui_state;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{env, io, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
        logger.filter_module("stilus", LevelFilter::Debug);
    }
    logger.init();

    // Restore the terminal even when we panic mid-draw.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let config = match config::Config::load().await {
        Ok(config) => config,
        Err(e) => {
            restore_terminal()?;
            eprintln!("failed to load configuration: {e}");
            return Err(e);
        }
    };
    let mut app = app::App::new(config);

    // Load the file named on the command line, if any.
    let args: Vec<String> = env::args().collect();
    if let Some(arg) = args.get(1) {
        let path = std::path::PathBuf::from(arg);
        match app.file_manager.open_file(path).await {
            Ok(content) => {
                app.editor.set_content(&content);
                log::info!("Loaded {arg} from the command line");
            }
            Err(e) => {
                app.ui_state.set_error(format!("Could not open {arg}: {e}"));
                log::error!("Failed to load '{arg}': {e}");
            }
        }
    } else {
        log::info!("No file specified, starting with an empty buffer");
    }

    let result = run_app(&mut terminal, app).await;

    restore_terminal()?;

    if let Err(ref err) = result {
        eprintln!("error: {err}");
        log::error!("Application error: {err}");
    }
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: app::App) -> Result<()> {
    loop {
        // Fold the last batch of edits into one undo step before the state
        // becomes observable on screen.
        app.editor.commit();

        if let Err(e) = terminal.draw(|f| ui::draw(f, &mut app)) {
            log::error!("Terminal draw error: {e}");
        }

        app.update_status();

        if app.should_quit() {
            log::info!("Shutting down");
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        app.request_quit();
                        continue;
                    }
                    if let Err(e) = app.handle_key_event(key).await {
                        log::error!("Key handling error: {e}");
                        app.ui_state.set_error(e.to_string());
                    }
                }
                Event::Resize(_, _) => {
                    // Picked up by the next draw.
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    let _ = execute!(stdout, crossterm::cursor::Show);
    Ok(())
}
