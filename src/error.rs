use thiserror::Error;

/// Static configuration problems. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("no formation slot for uniform number {0}")]
    UnknownUniform(u8),

    #[error("invalid server parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse server message: {0}")]
    Parse(String),

    #[error("connection closed")]
    Closed,
}

/// Anything that goes wrong while evaluating guards or running an action.
///
/// These never leave the decision engine; they are logged and replaced by the
/// look-around fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    #[error("self-belief is missing {0}")]
    MissingBelief(&'static str),

    #[error("ball is not visible")]
    BallNotVisible,

    #[error("behavior '{behavior}' failed: {reason}")]
    Behavior {
        behavior: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("node '{node}' died: {msg}")]
    NodeDied { node: String, msg: String },

    #[error("cannot launch agent process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("cannot install ctrl-c handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
