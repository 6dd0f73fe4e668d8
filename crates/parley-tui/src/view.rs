//! What goes into the widgets: the play area, styled dialogue text, and
//! the status line.

use parley_core::{EntityId, Point, WorldState};
use parley_dialogue::{InteractionController, InteractionState};
use ratatui::prelude::*;

use crate::pane::TextPane;

const FLOOR: char = '·';
const PLAYER: char = '@';

/// Render the play area one line per row.
///
/// `thinking` marks entities whose reply is being generated.
pub fn map_lines(world: &WorldState, thinking: impl Fn(EntityId) -> bool) -> Vec<Line<'static>> {
    let bounds = world.bounds();
    let floor = Style::default().fg(Color::DarkGray);
    let mut cells = vec![
        vec![(FLOOR, floor); usize::from(bounds.width)];
        usize::from(bounds.height)
    ];

    let mut put = |at: Point, glyph: char, style: Style| {
        let (Ok(x), Ok(y)) = (usize::try_from(at.x), usize::try_from(at.y)) else {
            return;
        };
        if let Some(cell) = cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = (glyph, style);
        }
    };

    for entity in world.entities() {
        let color = if thinking(entity.id) {
            Color::Magenta
        } else {
            Color::Cyan
        };
        put(
            entity.position,
            entity.glyph,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }
    put(
        world.player().position,
        PLAYER,
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    );

    cells
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|(glyph, style)| Span::styled(glyph.to_string(), style))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Style the dialogue text: reply options stand out, errors are red.
pub fn pane_lines(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|line| {
            let style = if is_option_line(line) {
                Style::default().fg(Color::Yellow)
            } else if line.starts_with("You: ") {
                Style::default().fg(Color::Green).add_modifier(Modifier::ITALIC)
            } else if line.contains("could not answer") {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(line.to_string(), style))
        })
        .collect()
}

fn is_option_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 3 && bytes[0] == b'[' && bytes[1].is_ascii_digit() && bytes[2] == b']'
}

/// One-line summary of what is going on.
pub fn status_line(controller: &InteractionController<TextPane>) -> String {
    let world = controller.world();
    let name_of = |id: EntityId| {
        world
            .get_entity(id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    };

    let mut status = match controller.state() {
        InteractionState::AwaitingGeneration(id) => format!("{} is thinking...", name_of(id)),
        InteractionState::Idle => {
            match world.nearest_entity(controller.config().interaction_radius) {
                Some(entity) => format!("Enter: talk to {}", entity.name),
                None => "Walk up to someone to talk".to_string(),
            }
        }
    };

    let others = controller
        .pending()
        .saturating_sub(usize::from(matches!(
            controller.state(),
            InteractionState::AwaitingGeneration(_)
        )));
    if others > 0 {
        status.push_str(&format!("  ({others} more thinking)"));
    }
    status.push_str("  ?:help  q:quit");
    status
}
