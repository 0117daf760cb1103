use crate::{Error, Result};
use log::{debug, warn};
use reqwest::{Client, Url};

/// Plain GET requests for playlists, keys and segments.
///
/// Cheap to clone, every clone shares the same connection pool.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the whole body of `url`.
    ///
    /// Only transport failures are errors. A non-success status is logged and its
    /// body returned anyway; it then fails parsing, decryption or the padding check.
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let network = |source| Error::Network {
            url: url.clone(),
            source,
        };

        let response = self.client.get(url.clone()).send().await.map_err(network)?;
        let status = response.status();

        if !status.is_success() {
            warn!("{} responded with HTTP {}", url, status);
        }

        let bytes = response.bytes().await.map_err(network)?;
        debug!("fetched {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }
}
