use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use region_map::app::App;
use region_map::config::Args;
use region_map::{logging, ui};
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init_logging(&args.log_dir, &args.log_file)
        .with_context(|| format!("failed to initialize logging in {}", args.log_dir.display()))?;
    let config = args.map_config();
    info!(source = %config.source, "starting region-map");

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture).context("failed to enable mouse capture")?;

    let size = terminal.size()?;
    let mut app = App::new(config, size.width, size.height);
    app.start_loading();

    let result = run(&mut terminal, &mut app);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    info!("exiting");
    result
}

/// Pointer events: hover, click, drag-to-pan and wheel zoom
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.pointer_move(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.begin_drag(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
            app.pointer_move(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(mouse.column, mouse.row),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc if app.has_modal() => app.close_modal(),
        KeyCode::Esc => app.quit(),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
        KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
        KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        KeyCode::Char('f') => app.fit(),
        KeyCode::Char('r') | KeyCode::Char('0') if !app.has_modal() => app.reset_view(),
        KeyCode::Enter => app.open_hovered(),

        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        app.poll_load();

        // Track size changes that arrive after the last Resize event
        let size = terminal.size()?;
        if (size.width, size.height) != (app.screen().width, app.screen().height) {
            app.resize(size.width, size.height);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
