use log::info;

use crate::domain::models::{FileSet, MatchedEpisode};

/// Pairs the entries of two file sets that share a key, in ascending key order.
pub fn match_episodes(source_a: &FileSet, source_b: &FileSet) -> Vec<MatchedEpisode> {
    let matched: Vec<MatchedEpisode> = source_a
        .iter()
        .filter_map(|(key, path_a)| {
            source_b.get(key).map(|path_b| MatchedEpisode {
                key: key.clone(),
                source_a: path_a.clone(),
                source_b: path_b.clone(),
            })
        })
        .collect();

    if matched.is_empty() {
        info!("No matching episodes found.");
    } else {
        info!("{} matching episodes found.", matched.len());
    }
    matched
}
