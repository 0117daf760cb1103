use crate::{Error, Result, fetch::Fetcher, persist};
use log::{debug, warn};
use reqwest::Url;
use segverify_crypto::{DecryptionContext, PaddingCheck, classify};
use std::path::Path;

/// A decrypted segment and the verdict on its padding.
#[derive(Clone, Debug)]
pub struct SegmentOutcome {
    pub status: PaddingCheck,
    pub bytes: Vec<u8>,
    pub uri: Url,
    /// Position in the media playlist, used in the file name.
    pub index: usize,
}

impl SegmentOutcome {
    /// Decrypt `body` and classify its padding. Does no I/O.
    pub fn decrypt(uri: Url, index: usize, context: &DecryptionContext, body: Vec<u8>) -> Result<Self> {
        let bytes = context
            .decrypt_segment(body)
            .map_err(|e| Error::crypto(&uri, e))?;
        let status = classify(&bytes).map_err(|e| Error::crypto(&uri, e))?;

        Ok(Self {
            status,
            bytes,
            uri,
            index,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    pub fn file_name(&self) -> String {
        match self.status {
            PaddingCheck::Valid => format!("segment{}.m4f", self.index),
            PaddingCheck::PaddingError => format!("error_segment{}.m4f", self.index),
        }
    }
}

/// Fetches, decrypts, checks and stores single segments.
#[derive(Clone, Debug)]
pub struct SegmentProcessor {
    fetcher: Fetcher,
    save_all: bool,
}

impl SegmentProcessor {
    pub fn new(fetcher: Fetcher, save_all: bool) -> Self {
        Self { fetcher, save_all }
    }

    /// Segments with broken padding are always written to `folder`, valid ones
    /// only when every segment should be saved.
    pub async fn process(
        &self,
        uri: &Url,
        context: &DecryptionContext,
        folder: &Path,
        index: usize,
    ) -> Result<SegmentOutcome> {
        let body = self.fetcher.fetch(uri).await?;
        let outcome = SegmentOutcome::decrypt(uri.clone(), index, context, body)?;

        if !outcome.is_valid() {
            warn!("Error segment padding incorrect on segment: {}", uri);
        }

        if !outcome.is_valid() || self.save_all {
            let path = persist::write(folder, &outcome.file_name(), &outcome.bytes).await?;
            debug!("wrote {}", path.display());
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        "https://cdn.example.com/seg7.ts".parse().unwrap()
    }

    #[test]
    fn test_file_names() {
        let ctx = DecryptionContext::new(&[0; 16], [0; 16]).unwrap();
        let mut outcome = SegmentOutcome::decrypt(uri(), 7, &ctx, vec![0; 16]).unwrap();

        outcome.status = PaddingCheck::Valid;
        assert_eq!(outcome.file_name(), "segment7.m4f");
        outcome.status = PaddingCheck::PaddingError;
        assert_eq!(outcome.file_name(), "error_segment7.m4f");
    }

    #[test]
    fn test_decrypt_errors_carry_uri() {
        let ctx = DecryptionContext::new(&[0; 16], [0; 16]).unwrap();

        let err = SegmentOutcome::decrypt(uri(), 0, &ctx, vec![]).unwrap_err();
        assert!(matches!(
            err,
            Error::Crypto {
                source: segverify_crypto::DecryptError::EmptyBody,
                ..
            }
        ));
        assert!(err.to_string().contains("seg7.ts"));

        assert!(matches!(
            SegmentOutcome::decrypt(uri(), 0, &ctx, vec![1; 20]),
            Err(Error::Crypto {
                source: segverify_crypto::DecryptError::Alignment(20),
                ..
            })
        ));
    }
}
