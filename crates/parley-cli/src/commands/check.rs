use std::path::Path;

use colored::Colorize;

pub fn run(world: Option<&Path>) -> Result<(), String> {
    let state = super::load_world(world)?;
    let bounds = state.bounds();

    println!(
        "  {} All checks passed for '{}'.",
        "ok".green().bold(),
        state.name
    );
    println!(
        "  {} characters on a {}x{} play area",
        state.entity_count(),
        bounds.width,
        bounds.height
    );

    Ok(())
}
