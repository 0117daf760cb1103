//! Typed view of the HLS playlists this tool walks through.
//!
//! Parsing is done by `m3u8-rs`; this module only keeps what the pipelines need
//! and resolves every uri against the playlist it was found in.

use crate::{Error, Result};
use m3u8_rs::{AlternativeMedia, ClosedCaptionGroupId, KeyMethod, VariantStream};
use reqwest::Url;
use segverify_crypto::DecryptError;
use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaylistKind {
    Master,
    Media,
}

impl Display for PlaylistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Master => "master",
            Self::Media => "media",
        })
    }
}

#[derive(Clone, Debug)]
pub enum Playlist {
    Master(MasterPlaylist),
    Media(MediaPlaylist),
}

#[derive(Clone, Debug, Default)]
pub struct MasterPlaylist {
    pub variants: Vec<Variant>,
}

#[derive(Clone, Debug)]
pub struct Variant {
    pub uri: Url,
    /// `EXT-X-I-FRAME-STREAM-INF` entry. These are never checked.
    pub i_frame: bool,
    /// Renditions from the variant's `AUDIO`, `VIDEO`, `SUBTITLES` and
    /// `CLOSED-CAPTIONS` groups which have their own playlist, in declared order.
    pub alternatives: Vec<Alternative>,
}

#[derive(Clone, Debug)]
pub struct Alternative {
    pub uri: Url,
    pub group_id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct MediaPlaylist {
    /// `None` marks an index without a segment.
    pub segments: Vec<Option<Segment>>,
    pub key: Option<EncryptionKey>,
}

#[derive(Clone, Debug)]
pub struct Segment {
    pub uri: Url,
}

/// The `EXT-X-KEY` shared by every segment of a media playlist.
#[derive(Clone, Debug)]
pub struct EncryptionKey {
    pub uri: Url,
    /// Hex IV exactly as written in the playlist, marker included.
    pub iv: String,
}

impl Playlist {
    /// Parse playlist text fetched from `url`.
    pub fn parse(url: &Url, bytes: &[u8]) -> Result<Self> {
        let parsed = m3u8_rs::parse_playlist_res(bytes).map_err(|e| Error::Parse {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(match parsed {
            m3u8_rs::Playlist::MasterPlaylist(m3u8) => Self::Master(MasterPlaylist::new(url, &m3u8)?),
            m3u8_rs::Playlist::MediaPlaylist(m3u8) => Self::Media(MediaPlaylist::new(url, &m3u8)?),
        })
    }

    pub fn kind(&self) -> PlaylistKind {
        match self {
            Self::Master(_) => PlaylistKind::Master,
            Self::Media(_) => PlaylistKind::Media,
        }
    }

    pub fn into_master(self, url: &Url) -> Result<MasterPlaylist> {
        match self {
            Self::Master(x) => Ok(x),
            x => Err(mismatch(url, PlaylistKind::Master, x.kind())),
        }
    }

    pub fn into_media(self, url: &Url) -> Result<MediaPlaylist> {
        match self {
            Self::Media(x) => Ok(x),
            x => Err(mismatch(url, PlaylistKind::Media, x.kind())),
        }
    }
}

fn mismatch(url: &Url, expected: PlaylistKind, found: PlaylistKind) -> Error {
    Error::TypeMismatch {
        url: url.clone(),
        expected,
        found,
    }
}

fn join(base: &Url, uri: &str) -> Result<Url> {
    base.join(uri).map_err(|e| Error::Parse {
        url: base.clone(),
        reason: format!("invalid uri {:?} ({})", uri, e),
    })
}

impl MasterPlaylist {
    fn new(url: &Url, m3u8: &m3u8_rs::MasterPlaylist) -> Result<Self> {
        let mut variants = vec![];

        for variant in &m3u8.variants {
            let mut alternatives = vec![];

            for alternative in m3u8.alternatives.iter().filter(|x| in_group(variant, x)) {
                if let Some(uri) = &alternative.uri {
                    alternatives.push(Alternative {
                        uri: join(url, uri)?,
                        group_id: alternative.group_id.clone(),
                        name: alternative.name.clone(),
                    });
                }
            }

            variants.push(Variant {
                uri: join(url, &variant.uri)?,
                i_frame: variant.is_i_frame,
                alternatives,
            });
        }

        Ok(Self { variants })
    }
}

fn in_group(variant: &VariantStream, alternative: &AlternativeMedia) -> bool {
    let group = Some(alternative.group_id.as_str());

    variant.audio.as_deref() == group
        || variant.video.as_deref() == group
        || variant.subtitles.as_deref() == group
        || matches!(
            &variant.closed_captions,
            Some(ClosedCaptionGroupId::GroupId(x)) if Some(x.as_str()) == group
        )
}

impl MediaPlaylist {
    fn new(url: &Url, m3u8: &m3u8_rs::MediaPlaylist) -> Result<Self> {
        let mut segments = Vec::with_capacity(m3u8.segments.len());

        for segment in &m3u8.segments {
            segments.push(if segment.uri.trim().is_empty() {
                None
            } else {
                Some(Segment {
                    uri: join(url, segment.uri.trim())?,
                })
            });
        }

        // m3u8-rs attaches EXT-X-KEY to the segment right after the tag only
        let key = match m3u8.segments.iter().find_map(|x| x.key.as_ref()) {
            None => None,
            Some(m3u8_rs::Key {
                method: KeyMethod::None,
                ..
            }) => None,
            Some(m3u8_rs::Key {
                method: KeyMethod::AES128,
                uri,
                iv,
                ..
            }) => {
                let uri = uri.as_deref().ok_or_else(|| Error::MissingKey(url.clone()))?;
                let iv = iv.clone().ok_or_else(|| {
                    Error::crypto(
                        url,
                        DecryptError::InvalidIv {
                            iv: String::new(),
                            reason: "keys without an explicit IV aren't supported".to_owned(),
                        },
                    )
                })?;

                Some(EncryptionKey {
                    uri: join(url, uri)?,
                    iv,
                })
            }
            Some(m3u8_rs::Key { method, .. }) => {
                return Err(Error::UnsupportedEncryption {
                    url: url.clone(),
                    method: method.to_string(),
                });
            }
        };

        Ok(Self { segments, key })
    }

    /// Number of indices holding a segment.
    pub fn segment_count(&self) -> usize {
        self.segments.iter().flatten().count()
    }
}
