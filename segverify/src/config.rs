use crate::{Error, Result};
use reqwest::{
    Client, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::{fmt::Display, path::PathBuf, str::FromStr};

/// Hosts serving gated content. Manifests on these hosts need an access token.
pub const GATED_HOSTS: &[&str] = &["deploys.brightcove.com"];

/// Folder used when a media playlist is checked directly.
pub const MEDIA_FOLDER: &str = "media";

pub const DEFAULT_THREADS: usize = 8;

pub const DEFAULT_USER_AGENT: &str = concat!("segverify/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ManifestType {
    #[default]
    Master,
    Media,
}

impl FromStr for ManifestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "master" => Ok(Self::Master),
            "media" => Ok(Self::Media),
            x => Err(Error::config(format!("type \"{}\" isn't supported", x))),
        }
    }
}

impl Display for ManifestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Master => "master",
            Self::Media => "media",
        })
    }
}

/// Settings for one run. Built once at startup and never changed afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    pub manifest: Url,
    pub manifest_type: ManifestType,
    /// Write segments with valid padding too, not only the broken ones.
    pub save_all: bool,
    /// Root under which the `video_*`, `audio_*` and `media` folders are created.
    pub directory: PathBuf,
    /// Maximum number of segments being processed at once, across all renditions.
    pub threads: usize,
    pub token: Option<String>,
    pub user_agent: String,
}

impl Config {
    pub fn new(manifest: Url) -> Self {
        Self {
            manifest,
            manifest_type: ManifestType::default(),
            save_all: false,
            directory: PathBuf::from("."),
            threads: DEFAULT_THREADS,
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Fails when the manifest lives on a gated host and no token was given.
    pub fn check_token(&self) -> Result<()> {
        if requires_token(&self.manifest) && self.token.as_deref().is_none_or(str::is_empty) {
            return Err(Error::config("no token provided on gated manifest request"));
        }

        Ok(())
    }

    /// HTTP client shared by every fetch of the run.
    pub fn client(&self) -> Result<Client> {
        let mut headers = HeaderMap::new();

        if let Some(token) = self.token.as_deref().filter(|x| !x.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::config("token contains characters not allowed in a header"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Client::builder()
            .user_agent(&self.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("could not build http client: {}", e)))
    }
}

pub fn requires_token(manifest: &Url) -> bool {
    manifest.host_str().is_some_and(|host| {
        GATED_HOSTS
            .iter()
            .any(|x| host == *x || host.ends_with(&format!(".{}", x)))
    })
}
