use super::{MediaReport, Pipeline, RunReport};
use crate::{Error, Result};
use log::{debug, warn};
use reqwest::Url;
use tokio::task::JoinSet;

type MediaSet = JoinSet<Result<(usize, MediaReport)>>;

impl Pipeline {
    /// Check every rendition of the master playlist at `uri`.
    ///
    /// Variant `i` goes to `video_<i>` and its `j`-th alternative to `audio_<i>_<j>`.
    /// I-frame variants are skipped but still count towards `i`.
    pub async fn run_master(&self, uri: &Url) -> Result<RunReport> {
        let master = self.fetch_playlist(uri).await?.into_master(uri)?;

        let mut set = JoinSet::new();
        let mut launched = 0;

        for (i, variant) in master.variants.into_iter().enumerate() {
            if variant.i_frame {
                debug!("skipping I-frame variant {}", variant.uri);
                continue;
            }

            self.spawn_media(&mut set, launched, variant.uri, format!("video_{}", i));
            launched += 1;

            for (j, alternative) in variant.alternatives.into_iter().enumerate() {
                let folder = format!("audio_{}_{}", i, j);
                debug!(
                    "{} ({}) from group {} goes to {}",
                    alternative.name, alternative.uri, alternative.group_id, folder
                );
                self.spawn_media(&mut set, launched, alternative.uri, folder);
                launched += 1;
            }
        }

        let mut reports = vec![None; launched];
        let mut cancelled = false;

        while let Some(result) = set.join_next().await {
            match result.map_err(Error::from).and_then(|x| x) {
                Ok((order, report)) => reports[order] = Some(report),
                // a sibling failed and closed the gate, its own error is still on the way
                Err(Error::Cancelled) => cancelled = true,
                Err(e) => {
                    self.close_gate();
                    set.shutdown().await;

                    let finished = reports.iter().flatten().collect::<Vec<_>>();
                    warn!("Stopped after {} of {} streams", finished.len(), launched);

                    for report in finished {
                        report.log_summary();
                    }

                    return Err(e);
                }
            }
        }

        if cancelled {
            return Err(Error::Cancelled);
        }

        Ok(RunReport {
            media: reports.into_iter().flatten().collect(),
        })
    }

    fn spawn_media(&self, set: &mut MediaSet, order: usize, uri: Url, folder: String) {
        let pipeline = self.clone();

        set.spawn(async move {
            pipeline
                .run_media(&uri, &folder)
                .await
                .map(|report| (order, report))
        });
    }
}
