use crate::{Error, Result, fetch::Fetcher, playlist::EncryptionKey};
use log::debug;
use segverify_crypto::DecryptionContext;

/// Download the key of a media playlist and pair it with the playlist's IV.
pub async fn resolve(fetcher: &Fetcher, key: &EncryptionKey) -> Result<DecryptionContext> {
    let bytes = fetcher.fetch(&key.uri).await?;
    let context =
        DecryptionContext::from_hex_iv(&bytes, &key.iv).map_err(|e| Error::crypto(&key.uri, e))?;

    debug!("using AES-{} key from {}", context.key_size() * 8, key.uri);
    Ok(context)
}
