use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

/// Longest persona excerpt shown in the table.
const EXCERPT_CHARS: usize = 57;

pub fn run(world: Option<&Path>) -> Result<(), String> {
    let state = super::load_world(world)?;

    if state.entity_count() == 0 {
        println!("  No characters in '{}'.", state.name);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Glyph", "Position", "Persona"]);

    for entity in state.entities() {
        let persona = entity.persona().replace('\n', " ");
        let excerpt = if persona.chars().count() > EXCERPT_CHARS + 3 {
            let cut: String = persona.chars().take(EXCERPT_CHARS).collect();
            format!("{cut}...")
        } else {
            persona
        };
        table.add_row(vec![
            entity.name.clone(),
            entity.glyph.to_string(),
            entity.position.to_string(),
            excerpt,
        ]);
    }

    println!("{}", state.name.bold());
    println!("{table}");
    println!();
    println!(
        "  {} characters, player starts at {}",
        state.entity_count(),
        state.player().position
    );

    Ok(())
}
