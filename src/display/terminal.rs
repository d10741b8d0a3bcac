use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::panic;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::viewer::{Action, ViewerState};

/// Raw mode and the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        // Constructed before the screen switch so a failure below still restores raw mode.
        let guard = TerminalGuard;
        execute!(stdout(), EnterAlternateScreen)?;

        // The release profile aborts on panic, which skips Drop.
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore();
            default_hook(info);
        }));

        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), LeaveAlternateScreen, Show);
}

/// Run the interactive viewer until the user quits.
/// `config_path` is where `w` saves the current settings.
pub fn run(config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    run_app(&mut terminal, config, config_path)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut viewer = ViewerState::from_config(&config);
    let poll_timeout = Duration::from_millis(250);
    let mut dirty = true;

    loop {
        if dirty {
            terminal.draw(|frame| viewer.render(frame))?;
            dirty = false;
        }

        if !event::poll(poll_timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match viewer.handle_key(key) {
                Action::Quit => break,
                Action::Save => {
                    save(&mut viewer, &config, config_path.as_deref());
                    dirty = true;
                }
                Action::Redraw => dirty = true,
                Action::Ignored => {}
            },
            Event::Resize(..) => dirty = true,
            _ => {}
        }
    }

    Ok(())
}

fn save(viewer: &mut ViewerState, config: &Config, config_path: Option<&Path>) {
    let Some(path) = config_path.map(Path::to_path_buf).or_else(Config::default_path) else {
        warn!("No config path to save to");
        viewer.set_notice("save failed: no config directory");
        return;
    };

    let mut snapshot = config.clone();
    viewer.apply_to(&mut snapshot);
    match snapshot.save(&path) {
        Ok(()) => {
            info!("Saved settings to {}", path.display());
            viewer.set_notice(format!("saved to {}", path.display()));
        }
        Err(e) => {
            warn!("Failed to save settings: {:#}", e);
            viewer.set_notice(format!("save failed: {}", e));
        }
    }
}
