use thiserror::Error;

/// Caller-facing failures.
///
/// Invariant violations inside the collapse pass are programming errors
/// and panic instead of surfacing here; a blocked move is a normal
/// `MoveOutcome` with `moved == false`, not an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown direction {0:?} (expected up/down/left/right or w/a/s/d)")]
    UnknownDirection(String),

    #[error("invalid rules: {0}")]
    InvalidRules(String),

    #[error("failed to read rules file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse rules file")]
    Toml(#[from] toml::de::Error),
}
