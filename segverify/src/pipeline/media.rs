use super::{MediaReport, Pipeline};
use crate::{Error, Result, key, persist, playlist::MediaPlaylist};
use log::{info, warn};
use reqwest::Url;
use std::sync::Arc;
use tokio::task::JoinSet;

impl Pipeline {
    /// Fetch the media playlist at `uri` and check all of its segments into `folder`.
    pub async fn run_media(&self, uri: &Url, folder: &str) -> Result<MediaReport> {
        let playlist = self.fetch_playlist(uri).await?.into_media(uri)?;
        self.process_media(uri, &playlist, folder).await
    }

    /// Check every segment of an already resolved media playlist.
    ///
    /// `folder` is relative to the configured output directory and is emptied
    /// before the first segment is written. Indices without a segment are skipped.
    pub async fn process_media(
        &self,
        uri: &Url,
        playlist: &MediaPlaylist,
        folder: &str,
    ) -> Result<MediaReport> {
        let key = playlist
            .key
            .as_ref()
            .ok_or_else(|| Error::MissingKey(uri.clone()))?;
        let context = Arc::new(key::resolve(&self.inner.fetcher, key).await?);

        let folder = self.inner.config.directory.join(folder);
        persist::clear(&folder).await?;

        info!("Starting decryption for: {}", uri);

        let mut report = MediaReport::new(uri.clone(), folder.clone());
        let mut set = JoinSet::new();

        for (index, segment) in playlist.segments.iter().enumerate() {
            let Some(segment) = segment else {
                continue;
            };

            let pipeline = self.clone();
            let context = Arc::clone(&context);
            let folder = folder.clone();
            let uri = segment.uri.clone();

            set.spawn(async move {
                let _permit = pipeline
                    .inner
                    .gate
                    .acquire()
                    .await
                    .map_err(|_| Error::Cancelled)?;

                pipeline
                    .inner
                    .processor
                    .process(&uri, &context, &folder, index)
                    .await
            });
        }

        report.total = set.len();

        while let Some(result) = set.join_next().await {
            match result.map_err(Error::from).and_then(|x| x) {
                Ok(outcome) => report.record(&outcome),
                Err(e) => {
                    self.close_gate();
                    set.shutdown().await;
                    warn!(
                        "Stopped {} after {} of {} segments",
                        uri,
                        report.processed(),
                        report.total
                    );
                    return Err(e);
                }
            }
        }

        report.padding_errors.sort_unstable();
        Ok(report)
    }
}
