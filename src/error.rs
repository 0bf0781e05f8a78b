use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    /// no output device, or the host refused to open one
    #[error("audio output unavailable: {0}")]
    ContextUnavailable(String),
    #[error("couldn't open audio asset {}: {source}", path.display())]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't decode audio: {0}")]
    Decode(String),
    #[error("couldn't stream {url}: {reason}")]
    RemoteStream { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't determine the config directory")]
    NoProjectDirs,
    #[error("couldn't read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("couldn't serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("couldn't write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
