use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Canonical identifier used to pair files across two source trees.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EpisodeKey(String);

impl EpisodeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key -> path mapping for one source tree. Later inserts overwrite earlier ones.
pub type FileSet = BTreeMap<EpisodeKey, PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Other(String),
}

impl StreamKind {
    pub fn from_codec_type(codec_type: Option<&str>) -> Self {
        match codec_type {
            Some("video") => StreamKind::Video,
            Some("audio") => StreamKind::Audio,
            Some("subtitle") => StreamKind::Subtitle,
            Some(other) => StreamKind::Other(other.to_string()),
            None => StreamKind::Other("unknown".to_string()),
        }
    }

    /// Stream specifier letter understood by the remux tool.
    pub fn specifier(&self) -> Option<char> {
        match self {
            StreamKind::Video => Some('v'),
            StreamKind::Audio => Some('a'),
            StreamKind::Subtitle => Some('s'),
            StreamKind::Other(name) => match name.as_str() {
                "data" => Some('d'),
                "attachment" => Some('t'),
                _ => None,
            },
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Video => f.write_str("video"),
            StreamKind::Audio => f.write_str("audio"),
            StreamKind::Subtitle => f.write_str("subtitle"),
            StreamKind::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StreamTags {
    pub language: Option<String>,
    pub title: Option<String>,
}

/// One elementary stream inside a container, as reported by the probe tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub index: u32,
    pub kind: StreamKind,
    pub codec_name: Option<String>,
    pub tags: StreamTags,
}

impl StreamDescriptor {
    pub fn language(&self) -> Option<&str> {
        self.tags.language.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.tags.title.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEpisode {
    pub key: EpisodeKey,
    pub source_a: PathBuf,
    pub source_b: PathBuf,
}
