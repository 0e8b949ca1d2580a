use crate::state::ActivityPhase;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Why a mutation was rejected. The state is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no activity {id:?} in phase {}", phase.label())]
    UnknownActivity { phase: ActivityPhase, id: String },

    #[error("index {index} out of range for phase {} with {len} activities", phase.label())]
    IndexOutOfRange {
        phase: ActivityPhase,
        index: usize,
        len: usize,
    },

    #[error("timer duration must be above zero minutes, and a timed activity needs one")]
    InvalidTimer,

    #[error("activity label must not be empty")]
    EmptyLabel,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
