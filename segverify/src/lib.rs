//! Walk an HLS manifest down to its AES-128 encrypted segments, decrypt them and
//! flag every segment whose plaintext doesn't end in valid PKCS#7 padding.
//!
//! ```no_run
//! use segverify::{Config, Pipeline};
//!
//! # async fn check() -> segverify::Result<()> {
//! let config = Config::new("https://example.com/master.m3u8".parse().unwrap());
//! let report = Pipeline::new(config)?.run().await?;
//! println!("{} segments with padding errors", report.padding_errors());
//! # Ok(())
//! # }
//! ```

mod args;
mod config;
mod error;
mod fetch;
mod key;
mod persist;
mod pipeline;
mod playlist;
mod segment;

pub mod logger;

#[doc(hidden)]
pub use args::Args;
pub use config::{Config, GATED_HOSTS, MEDIA_FOLDER, ManifestType};
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use pipeline::{MediaReport, Pipeline, RunReport};
pub use playlist::{
    Alternative, EncryptionKey, MasterPlaylist, MediaPlaylist, Playlist, PlaylistKind, Segment,
    Variant,
};
pub use reqwest;
pub use segment::{SegmentOutcome, SegmentProcessor};
pub use segverify_crypto::{DecryptError, DecryptionContext, PaddingCheck};
