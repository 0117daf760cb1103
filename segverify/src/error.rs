use crate::playlist::PlaylistKind;
use reqwest::Url;
use segverify_crypto::DecryptError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// A `Result` alias where the `Err` case is `segverify::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a run.
///
/// Broken padding is not in here, it is reported through
/// [`SegmentOutcome`](crate::SegmentOutcome) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("failed to fetch {url}: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse playlist {url}: {reason}")]
    Parse { url: Url, reason: String },

    #[error("manifest must be of {expected} type, found {found} playlist at {url}")]
    TypeMismatch {
        url: Url,
        expected: PlaylistKind,
        found: PlaylistKind,
    },

    #[error("no encryption key found in {0}")]
    MissingKey(Url),

    #[error("{method} encryption is not supported ({url})")]
    UnsupportedEncryption { url: Url, method: String },

    #[error("{url}: {source}")]
    Crypto {
        url: Url,
        #[source]
        source: DecryptError,
    },

    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A segment was still queued when another part of the run failed.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn crypto(url: &Url, source: DecryptError) -> Self {
        Self::Crypto {
            url: url.clone(),
            source,
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
