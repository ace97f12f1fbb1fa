pub mod actions;
pub mod app;
pub mod input;
pub mod palette;
pub mod picker;
pub mod render;
pub mod router;
pub mod theme;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::{config_dir, read_config};
use crate::remote::{HttpTransport, Transport};

use app::App;

/// Run the TUI against the configured outline server.
pub fn run(
    server: Option<&str>,
    token: Option<&str>,
    outline: Option<&str>,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = read_config(config_path)?;
    if let Some(url) = server {
        config.server.url = url.to_string();
    }
    if let Some(token) = token {
        config.server.token = Some(token.to_string());
    }
    let outline_id = outline
        .map(str::to_string)
        .or_else(|| config.server.default_outline.clone())
        .ok_or("no outline given (pass one, or set server.default_outline in config.toml)")?;

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
        &config.server.url,
        config.server.token.clone(),
    )?);
    let page = transport.load(&outline_id)?;

    let mut app = App::new(page, transport, &config);
    app.state_dir = Some(config_dir());
    app.restore_device_state();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    app.save_device_state();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        // Settle requests, fire debounce deadlines, expire messages.
        app.tick(Instant::now());

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            router::dispatch(app, key);
            // Debounced device-state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                app.save_device_state();
                save_counter = 0;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
