//! Orchestration of a run: master playlist → renditions → segments.
//!
//! Every level runs its children as tasks of a [`JoinSet`](tokio::task::JoinSet).
//! The first failing child aborts its siblings and the error is handed to the
//! caller. Segment work of the whole run shares one semaphore sized by
//! [`Config::threads`], which is closed once anything fails so queued segments
//! of other renditions stop with [`Error::Cancelled`](crate::Error::Cancelled).

mod master;
mod media;
mod report;

pub use report::{MediaReport, RunReport};

use crate::{
    Result,
    config::{Config, MEDIA_FOLDER, ManifestType},
    fetch::Fetcher,
    playlist::Playlist,
    segment::SegmentProcessor,
};
use reqwest::Url;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Cheap handle to the state shared by every task of a run.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    fetcher: Fetcher,
    processor: SegmentProcessor,
    gate: Semaphore,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(config.client()?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        Self {
            inner: Arc::new(Inner {
                gate: Semaphore::new(config.threads.max(1)),
                processor: SegmentProcessor::new(fetcher.clone(), config.save_all),
                fetcher,
                config,
            }),
        }
    }

    /// Check the configured manifest.
    pub async fn run(&self) -> Result<RunReport> {
        let manifest = &self.inner.config.manifest;

        match self.inner.config.manifest_type {
            ManifestType::Master => self.run_master(manifest).await,
            ManifestType::Media => Ok(RunReport {
                media: vec![self.run_media(manifest, MEDIA_FOLDER).await?],
            }),
        }
    }

    /// Fail every segment still waiting for a permit with [`Error::Cancelled`](crate::Error::Cancelled).
    ///
    /// Called on the first error. The pipeline can't check anything afterwards.
    fn close_gate(&self) {
        self.inner.gate.close();
    }

    async fn fetch_playlist(&self, uri: &Url) -> Result<Playlist> {
        let bytes = self.inner.fetcher.fetch(uri).await?;
        Playlist::parse(uri, &bytes)
    }
}
