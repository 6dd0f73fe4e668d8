pub mod check;
pub mod list;
pub mod play;

use std::path::Path;

use parley_core::{WorldDefinition, WorldState};

/// Load a world file, or the built-in village when no path is given, and
/// build its state.
fn load_world(path: Option<&Path>) -> Result<WorldState, String> {
    let definition = match path {
        Some(path) => WorldDefinition::load(path),
        None => WorldDefinition::builtin(),
    }
    .map_err(|e| e.to_string())?;

    definition.build().map_err(|e| match path {
        Some(path) => format!("{}: {e}", path.display()),
        None => e.to_string(),
    })
}
