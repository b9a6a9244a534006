use log::info;
use serde::Deserialize;
use std::path::Path;

use crate::domain::models::{StreamDescriptor, StreamKind, StreamTags};
use crate::error::{MediaError, MediaResult};

pub const UNKNOWN_LANGUAGE: &str = "unknown";

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<Stream>,
}

#[derive(Debug, Deserialize)]
struct Stream {
    index: u32,
    codec_type: Option<String>,
    codec_name: Option<String>,
    tags: Option<StreamTags>,
}

impl Stream {
    fn into_descriptor(self) -> StreamDescriptor {
        StreamDescriptor {
            index: self.index,
            kind: StreamKind::from_codec_type(self.codec_type.as_deref()),
            codec_name: self.codec_name,
            tags: self.tags.unwrap_or_default(),
        }
    }
}

/// Parses the JSON document printed by `ffprobe -show_entries stream -of json`.
pub fn parse_streams(path: &Path, json: &[u8]) -> MediaResult<Vec<StreamDescriptor>> {
    let output: FfprobeOutput =
        serde_json::from_slice(json).map_err(|source| MediaError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(output.streams.into_iter().map(Stream::into_descriptor).collect())
}

pub fn log_streams(path: &Path, streams: &[StreamDescriptor]) {
    info!("Streams in {path:?}:");
    for stream in streams {
        info!(
            "  Stream #{}: Type={}, Codec={}, Language={}, Title={}",
            stream.index,
            stream.kind,
            stream.codec_name.as_deref().unwrap_or("unknown"),
            stream.language().unwrap_or(UNKNOWN_LANGUAGE),
            stream.title().unwrap_or("no title"),
        );
    }
}

/// Index of the first audio stream whose language tag contains `language`
/// or whose title contains `title`, both compared case-insensitively.
pub fn find_language_audio_index(
    streams: &[StreamDescriptor],
    language: &str,
    title: &str,
) -> Option<u32> {
    let language = language.to_lowercase();
    let title = title.to_lowercase();
    let contains = |tag: Option<&str>, needle: &str| {
        tag.map(|t| t.to_lowercase().contains(needle))
            .unwrap_or(false)
    };

    streams
        .iter()
        .filter(|s| s.kind == StreamKind::Audio)
        .find(|s| contains(s.language(), &language) || contains(s.title(), &title))
        .map(|s| s.index)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamPartition {
    pub video: Option<u32>,
    /// Audio streams in listed order with their language tag.
    pub audio: Vec<(u32, String)>,
}

impl StreamPartition {
    /// The first listed audio stream. This is taken as the native-language
    /// track without checking its language tag.
    pub fn primary_audio(&self) -> Option<(u32, &str)> {
        self.audio
            .first()
            .map(|(index, language)| (*index, language.as_str()))
    }
}

pub fn partition_streams(streams: &[StreamDescriptor]) -> StreamPartition {
    let mut partition = StreamPartition::default();
    for stream in streams {
        match stream.kind {
            StreamKind::Video if partition.video.is_none() => {
                partition.video = Some(stream.index);
            }
            StreamKind::Audio => {
                let language = stream.language().unwrap_or(UNKNOWN_LANGUAGE);
                partition.audio.push((stream.index, language.to_string()));
            }
            _ => {}
        }
    }
    partition
}

#[cfg(test)]
pub(crate) fn stream(index: u32, kind: StreamKind, language: Option<&str>) -> StreamDescriptor {
    StreamDescriptor {
        index,
        kind,
        codec_name: None,
        tags: StreamTags {
            language: language.map(str::to_string),
            title: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "programs": [],
        "streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video", "width": 1920},
            {"index": 1, "codec_name": "aac", "codec_type": "audio",
             "tags": {"language": "jpn", "title": "Japanese"}},
            {"index": 2, "codec_name": "ac3", "codec_type": "audio",
             "tags": {"language": "ENG"}},
            {"index": 3, "codec_name": "ass", "codec_type": "subtitle",
             "tags": {"language": "fre", "title": "Francais"}},
            {"index": 4, "codec_type": "attachment"}
        ]
    }"#;

    fn titled(index: u32, language: Option<&str>, title: &str) -> StreamDescriptor {
        let mut s = stream(index, StreamKind::Audio, language);
        s.tags.title = Some(title.to_string());
        s
    }

    #[test]
    fn test_parse_streams() {
        let streams = parse_streams(Path::new("a.mkv"), SAMPLE.as_bytes()).unwrap();
        assert_eq!(streams.len(), 5);
        assert_eq!(streams[0].kind, StreamKind::Video);
        assert_eq!(streams[0].codec_name.as_deref(), Some("h264"));
        assert_eq!(streams[1].language(), Some("jpn"));
        assert_eq!(streams[1].title(), Some("Japanese"));
        assert_eq!(streams[3].kind, StreamKind::Subtitle);
        assert_eq!(streams[4].kind, StreamKind::Other("attachment".to_string()));
        assert_eq!(streams[4].tags, StreamTags::default());
    }

    #[test]
    fn test_parse_missing_streams_is_empty() {
        let streams = parse_streams(Path::new("a.mkv"), b"{}").unwrap();
        assert!(streams.is_empty());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_streams(Path::new("a.mkv"), b"not json").unwrap_err();
        assert!(matches!(err, MediaError::ParseFailed { .. }));
    }

    #[test]
    fn test_find_language_is_case_insensitive() {
        let streams = parse_streams(Path::new("a.mkv"), SAMPLE.as_bytes()).unwrap();
        assert_eq!(find_language_audio_index(&streams, "eng", "english"), Some(2));
    }

    #[test]
    fn test_find_language_matches_title() {
        let streams = vec![
            titled(1, Some("jpn"), "Japanese"),
            titled(2, None, "English Dub"),
            titled(3, Some("eng"), "Commentary"),
        ];
        assert_eq!(find_language_audio_index(&streams, "eng", "english"), Some(2));
    }

    #[test]
    fn test_find_language_ignores_non_audio() {
        let streams = vec![
            stream(0, StreamKind::Video, Some("eng")),
            stream(1, StreamKind::Subtitle, Some("eng")),
            stream(2, StreamKind::Audio, Some("jpn")),
        ];
        assert_eq!(find_language_audio_index(&streams, "eng", "english"), None);
    }

    #[test]
    fn test_find_language_first_match_wins() {
        let streams = vec![
            stream(5, StreamKind::Audio, Some("eng")),
            stream(6, StreamKind::Audio, Some("eng")),
        ];
        assert_eq!(find_language_audio_index(&streams, "ENG", "english"), Some(5));
    }

    #[test]
    fn test_partition_streams() {
        let streams = parse_streams(Path::new("a.mkv"), SAMPLE.as_bytes()).unwrap();
        let partition = partition_streams(&streams);
        assert_eq!(partition.video, Some(0));
        assert_eq!(
            partition.audio,
            vec![(1, "jpn".to_string()), (2, "ENG".to_string())]
        );
        assert_eq!(partition.primary_audio(), Some((1, "jpn")));
    }

    #[test]
    fn test_partition_keeps_first_video_and_defaults_language() {
        let streams = vec![
            stream(0, StreamKind::Audio, None),
            stream(1, StreamKind::Video, None),
            stream(2, StreamKind::Video, None),
        ];
        let partition = partition_streams(&streams);
        assert_eq!(partition.video, Some(1));
        assert_eq!(partition.primary_audio(), Some((0, UNKNOWN_LANGUAGE)));
    }

    #[test]
    fn test_primary_audio_is_not_revalidated() {
        // The first audio stream is primary even when a later one carries the native tag.
        let streams = vec![
            stream(0, StreamKind::Video, None),
            stream(1, StreamKind::Audio, Some("eng")),
            stream(2, StreamKind::Audio, Some("jpn")),
        ];
        assert_eq!(partition_streams(&streams).primary_audio(), Some((1, "eng")));
    }

    #[test]
    fn test_partition_empty() {
        let partition = partition_streams(&[]);
        assert_eq!(partition.video, None);
        assert_eq!(partition.primary_audio(), None);
    }
}
