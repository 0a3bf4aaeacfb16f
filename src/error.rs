#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaneditError {
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("cannot parse value for '{property}': {msg}")]
    Parse { property: String, msg: String },

    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config key '{0}'")]
    InvalidConfigKey(String),

    #[error("invalid config value for '{key}': {msg}")]
    InvalidConfigValue { key: String, msg: String },

    #[error("script error: {0}")]
    Script(String),

    #[error("io error at {path}: {source}")]
    IoPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}
