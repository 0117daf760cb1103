use crate::{
    Error, Result,
    config::{Config, DEFAULT_USER_AGENT, ManifestType},
};
use clap::{ColorChoice, Parser};
use reqwest::Url;
use std::path::PathBuf;

/// Decrypt every segment of an AES-128 encrypted HLS stream and save the ones
/// whose PKCS#7 padding is broken.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Master or media playlist uri to start from.
    /// Manifests served from gated hosts also need --token.
    #[arg(short, long, required = true)]
    pub manifest: String,

    /// Kind of playlist passed with --manifest, can be "master" or "media".
    #[arg(short = 'y', long = "type", default_value = "master", value_name = "TYPE")]
    pub manifest_type: String,

    /// Save every segment, and not only segments failing the padding check.
    #[arg(short, long)]
    pub save: bool,

    /// Directory under which video_*, audio_* and media folders are written.
    /// Folders are cleared before a stream is checked.
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Maximum number of segments downloaded and decrypted at once.
    #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(1..=64))]
    pub threads: u8,

    /// Access token for manifests served from gated hosts.
    /// Sent as a bearer token with every request.
    #[arg(long, help_heading = "Client Options", env = "SEGVERIFY_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Update and set user agent header for requests.
    #[arg(long, help_heading = "Client Options", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Print debug logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// When to output colored text.
    #[arg(long, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

impl Args {
    /// Validate arguments into a [`Config`]. Nothing here touches the network.
    pub fn into_config(self) -> Result<Config> {
        if self.manifest.trim().is_empty() {
            return Err(Error::config("no manifest uri provided"));
        }

        let manifest_type = self.manifest_type.parse::<ManifestType>()?;
        let manifest = self
            .manifest
            .trim()
            .parse::<Url>()
            .map_err(|e| Error::config(format!("invalid manifest uri {:?}: {}", self.manifest, e)))?;

        let config = Config {
            manifest,
            manifest_type,
            save_all: self.save,
            directory: self.directory,
            threads: self.threads as usize,
            token: self.token,
            user_agent: self.user_agent,
        };

        config.check_token()?;
        Ok(config)
    }
}
