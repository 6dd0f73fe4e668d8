//! Terminal setup, teardown, and main event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{InputMode, TuiApp};
use crate::view;

/// How long to wait for a key before checking for finished replies.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Launch the TUI and run until the player quits.
pub fn run(mut app: TuiApp) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if app.controller.pending() > 0 {
        tracing::info!(
            abandoned = app.controller.pending(),
            "left with replies still being generated"
        );
    }
    result
}

/// Main event loop. Finished replies are applied between key presses.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
) -> Result<(), String> {
    loop {
        app.tick();

        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        if !event::poll(POLL_INTERVAL).map_err(|e| format!("event error: {e}"))? {
            continue;
        }
        match event::read().map_err(|e| format!("event error: {e}"))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            _ => {}
        }
    }
}

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &TuiApp) {
    let world = app.controller.world();
    let map_height = world.bounds().height.saturating_add(2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(map_height), // Play area
            Constraint::Min(3),             // Dialogue
            Constraint::Length(3),          // Reply input
            Constraint::Length(1),          // Status bar
        ])
        .split(frame.area());

    // Play area
    let controller = &app.controller;
    let map = Paragraph::new(view::map_lines(world, |id| {
        controller.session(id).is_some_and(|s| s.is_awaiting())
    }))
    .block(
        Block::default()
            .title(format!(" {} ", world.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    frame.render_widget(map, chunks[0]);

    // Dialogue pane
    let pane = controller.display();
    let dialogue = Paragraph::new(view::pane_lines(pane.text()))
        .block(
            Block::default()
                .title(" Dialogue ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .wrap(Wrap { trim: false })
        .scroll((pane.scroll(), 0));
    frame.render_widget(dialogue, chunks[1]);

    // Reply input
    let (input_text, border) = match app.mode {
        InputMode::Typing => (format!("> {}", app.input_text()), Color::Green),
        InputMode::Explore => ("/ to type a reply".to_string(), Color::DarkGray),
    };
    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(input, chunks[2]);

    if app.mode == InputMode::Typing {
        let typed = app.input_text()[..app.input_cursor()].chars().count();
        let cursor_x = chunks[2].x + 1 + 2 + u16::try_from(typed).unwrap_or(u16::MAX);
        let cursor_y = chunks[2].y + 1;
        if cursor_x < chunks[2].x + chunks[2].width.saturating_sub(1) {
            frame.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }

    // Status bar
    let status = Paragraph::new(view::status_line(controller))
        .style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, chunks[3]);
}
