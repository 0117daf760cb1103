use crate::segment::SegmentOutcome;
use colored::Colorize;
use log::info;
use reqwest::Url;
use std::path::PathBuf;

/// Tally of one media playlist.
#[derive(Clone, Debug)]
pub struct MediaReport {
    pub uri: Url,
    pub folder: PathBuf,
    /// Segments launched, absent indices excluded.
    pub total: usize,
    pub valid: usize,
    /// Indices of segments with broken padding, ascending once the run finished.
    pub padding_errors: Vec<usize>,
}

impl MediaReport {
    pub(super) fn new(uri: Url, folder: PathBuf) -> Self {
        Self {
            uri,
            folder,
            total: 0,
            valid: 0,
            padding_errors: vec![],
        }
    }

    pub(super) fn record(&mut self, outcome: &SegmentOutcome) {
        if outcome.is_valid() {
            self.valid += 1;
        } else {
            self.padding_errors.push(outcome.index);
        }
    }

    pub fn processed(&self) -> usize {
        self.valid + self.padding_errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.padding_errors.is_empty()
    }

    pub fn log_summary(&self) {
        let status = if self.is_clean() {
            "ok".bold().green()
        } else {
            format!("{} padding errors", self.padding_errors.len())
                .bold()
                .red()
        };

        info!(
            "{} {}/{} valid ({}) {}",
            self.folder.display(),
            self.valid,
            self.total,
            status,
            self.uri
        );

        if !self.is_clean() {
            info!(
                "  error segments: {}",
                self.padding_errors
                    .iter()
                    .map(|x| x.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
}

/// Reports of every media playlist checked in a run, in launch order.
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub media: Vec<MediaReport>,
}

impl RunReport {
    pub fn padding_errors(&self) -> usize {
        self.media.iter().map(|x| x.padding_errors.len()).sum()
    }

    pub fn segments(&self) -> usize {
        self.media.iter().map(|x| x.total).sum()
    }

    pub fn log_summary(&self) {
        for report in &self.media {
            report.log_summary();
        }

        info!(
            "Checked {} segments in {} streams, {} with padding errors",
            self.segments(),
            self.media.len(),
            self.padding_errors()
        );
    }
}
