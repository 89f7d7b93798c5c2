//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Wraps every failure `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// The grid described by the config could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: gridcraft_world::WorldError,
    },
}
