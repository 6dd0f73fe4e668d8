//! Terminal UI for Parley.
//!
//! Draws the play area and the dialogue pane with ratatui, maps crossterm
//! key events to game inputs, and runs the event loop that interleaves
//! input with finished generation requests.

pub mod app;
pub mod keys;
pub mod pane;
pub mod terminal;
pub mod view;
