use std::path::PathBuf;

use crate::entity::EntityId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading or manipulating a world.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested entity ID does not exist in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity with the same name already exists.
    #[error("entity already exists: \"{0}\"")]
    DuplicateName(String),

    /// A position lies outside the play area.
    #[error("\"{name}\" is placed at {position}, outside the {width}x{height} play area")]
    OutOfBounds {
        /// Who was misplaced.
        name: String,
        /// The offending position.
        position: crate::grid::Point,
        /// Play area width.
        width: u16,
        /// Play area height.
        height: u16,
    },

    /// A world file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A world file is not valid JSON for a world definition.
    #[error("invalid world file: {0}")]
    Json(#[from] serde_json::Error),

    /// A generic validation error with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}
