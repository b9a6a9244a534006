use regex::Regex;
use std::sync::OnceLock;

use crate::domain::models::EpisodeKey;

pub const DEFAULT_DUB_MARKER: &str = " English Dub";

/// How a file name is turned into an [`EpisodeKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStrategy {
    /// `S<1-2 digits> E<1-2 digits>` anywhere in the name, normalized to `SxxExx`.
    SeasonEpisode,
    /// The file name itself.
    FileName,
    /// Only names containing the marker; the key is the name with the marker removed.
    MarkerStripped(String),
}

impl KeyStrategy {
    pub fn extract(&self, file_name: &str) -> Option<EpisodeKey> {
        match self {
            KeyStrategy::SeasonEpisode => {
                let (season, episode) = parse_season_episode(file_name)?;
                Some(season_episode_key(season, episode))
            }
            KeyStrategy::FileName => Some(EpisodeKey::new(file_name)),
            KeyStrategy::MarkerStripped(marker) => {
                if marker.is_empty() || !file_name.contains(marker.as_str()) {
                    return None;
                }
                Some(EpisodeKey::new(file_name.replace(marker.as_str(), "")))
            }
        }
    }

    /// Whether a missing key is worth a warning. Marker filtering is expected to skip files.
    pub fn warns_on_miss(&self) -> bool {
        matches!(self, KeyStrategy::SeasonEpisode)
    }
}

fn season_episode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"S(\d{1,2}) E(\d{1,2})").expect("static regex is valid"))
}

pub fn parse_season_episode(file_name: &str) -> Option<(u32, u32)> {
    let caps = season_episode_regex().captures(file_name)?;
    let season = caps.get(1)?.as_str().parse().ok()?;
    let episode = caps.get(2)?.as_str().parse().ok()?;
    Some((season, episode))
}

pub fn season_episode_key(season: u32, episode: u32) -> EpisodeKey {
    EpisodeKey::new(format!("S{season:02}E{episode:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(strategy: &KeyStrategy, name: &str) -> Option<String> {
        strategy.extract(name).map(|k| k.as_str().to_string())
    }

    #[test]
    fn test_season_episode_is_zero_padded() {
        let s = KeyStrategy::SeasonEpisode;
        assert_eq!(key(&s, "Show S1 E2.mkv").as_deref(), Some("S01E02"));
        assert_eq!(key(&s, "Show S01 E02.mkv").as_deref(), Some("S01E02"));
        assert_eq!(key(&s, "Show S12 E34 - Title.mp4").as_deref(), Some("S12E34"));
        assert_eq!(key(&s, "S3 E10").as_deref(), Some("S03E10"));
    }

    #[test]
    fn test_season_episode_requires_exact_pattern() {
        let s = KeyStrategy::SeasonEpisode;
        // No separator space
        assert_eq!(key(&s, "Show S01E02.mkv"), None);
        // Case-sensitive
        assert_eq!(key(&s, "Show s01 e02.mkv"), None);
        assert_eq!(key(&s, "Show Episode 2.mkv"), None);
        assert_eq!(key(&s, "Show S01  E02.mkv"), None);
    }

    #[test]
    fn test_season_episode_takes_first_two_digits() {
        // Three digit episode numbers match on their first two digits.
        let s = KeyStrategy::SeasonEpisode;
        assert_eq!(key(&s, "Show S01 E123.mkv").as_deref(), Some("S01E12"));
    }

    #[test]
    fn test_file_name_strategy() {
        let s = KeyStrategy::FileName;
        assert_eq!(
            key(&s, "Episode S01 E01.mkv").as_deref(),
            Some("Episode S01 E01.mkv")
        );
    }

    #[test]
    fn test_marker_stripped_strategy() {
        let s = KeyStrategy::MarkerStripped(DEFAULT_DUB_MARKER.to_string());
        assert_eq!(
            key(&s, "Episode S01 E01 English Dub.mkv").as_deref(),
            Some("Episode S01 E01.mkv")
        );
        assert_eq!(key(&s, "Episode S01 E01.mkv"), None);
        assert!(!s.warns_on_miss());
    }

    #[test]
    fn test_empty_marker_matches_nothing() {
        let s = KeyStrategy::MarkerStripped(String::new());
        assert_eq!(key(&s, "Episode S01 E01.mkv"), None);
    }
}
