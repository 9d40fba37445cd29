//! Series metadata from file names.
//!
//! Recognized forms, tried in order:
//! 1. `<name>_SEASON<N>_<M>_<marker>` where marker is `ep`, `epizoda` or `episode`
//! 2. `<name>_S<NN>E<MM>`

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::domain::MediaItem;

// ---------- Regex patterns ----------

static SEASON_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)_SEASON(\d{1,3})_(\d{1,4})_(?:episode|epizoda|ep)")
        .expect("season word regex should compile")
});

static SEASON_SXXEYY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)_S(\d{1,3})E(\d{1,4})").expect("SxxEyy regex should compile")
});

/// Patterns in evaluation order; each captures name, season, episode.
static SERIES_PATTERNS: Lazy<[&'static Regex; 2]> = Lazy::new(|| [&*SEASON_WORD, &*SEASON_SXXEYY]);

/// Parsed series position of one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesInfo {
    pub name: String,
    pub season: u32,
    pub episode: u32,
}

/// Parse series info from a file name, or `None` when no pattern matches.
pub fn parse_series(filename: &str) -> Option<SeriesInfo> {
    SERIES_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(filename)?;
        Some(SeriesInfo {
            name: caps.get(1)?.as_str().to_string(),
            season: caps.get(2)?.as_str().parse().ok()?,
            episode: caps.get(3)?.as_str().parse().ok()?,
        })
    })
}

/// All episodes of one series in playback order.
#[derive(Debug, Clone)]
pub struct SeriesGroup<'a> {
    pub name: String,
    pub episodes: Vec<&'a MediaItem>,
}

impl SeriesGroup<'_> {
    pub fn position(&self, path: &str) -> Option<usize> {
        self.episodes.iter().position(|item| item.path == path)
    }
}

/// Group items by series name (ascending) and sort each group by
/// `(season, episode)`. Items without series info are left out. The sort is
/// stable, so duplicate positions keep scan order.
pub fn group_series(items: &[MediaItem]) -> Vec<SeriesGroup<'_>> {
    let mut groups: BTreeMap<String, Vec<(u32, u32, &MediaItem)>> = BTreeMap::new();
    for item in items {
        if let Some(info) = parse_series(&item.filename) {
            groups.entry(info.name).or_default().push((info.season, info.episode, item));
        }
    }

    groups
        .into_iter()
        .map(|(name, mut episodes)| {
            episodes.sort_by_key(|(season, episode, _)| (*season, *episode));
            SeriesGroup {
                name,
                episodes: episodes.into_iter().map(|(_, _, item)| item).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sxxeyy() {
        let info = parse_series("Show_S01E02.mp4").unwrap();
        assert_eq!(info.name, "Show");
        assert_eq!(info.season, 1);
        assert_eq!(info.episode, 2);
    }

    #[test]
    fn test_parse_season_word() {
        let info = parse_series("Zitije_svetih_SEASON2_14_epizoda.mkv").unwrap();
        assert_eq!(info.name, "Zitije_svetih");
        assert_eq!(info.season, 2);
        assert_eq!(info.episode, 14);
    }

    #[test]
    fn test_parse_lowercase() {
        let info = parse_series("my_show_s03e10.mp4").unwrap();
        assert_eq!(info.name, "my_show");
        assert_eq!(info.season, 3);
        assert_eq!(info.episode, 10);
    }

    #[test]
    fn test_parse_no_match() {
        assert!(parse_series("MockVideo_Serije_001.mp4").is_none());
        assert!(parse_series("Show_SEASON1_3.mp4").is_none());
    }

    #[test]
    fn test_group_sorted_by_season_episode() {
        let items = vec![
            MediaItem::new("/s/Show_S02E01.mp4", 1.0, 0),
            MediaItem::new("/s/Show_S01E10.mp4", 1.0, 0),
            MediaItem::new("/s/Show_S01E02.mp4", 1.0, 0),
            MediaItem::new("/s/Other_S01E01.mp4", 1.0, 0),
            MediaItem::new("/s/trailer.mp4", 1.0, 0),
        ];
        let groups = group_series(&items);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Other");
        assert_eq!(groups[1].name, "Show");

        let order: Vec<_> = groups[1].episodes.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(order, vec!["Show_S01E02.mp4", "Show_S01E10.mp4", "Show_S02E01.mp4"]);
        assert_eq!(groups[1].position("/s/Show_S01E10.mp4"), Some(1));
    }

    #[test]
    fn test_group_ties_keep_scan_order() {
        let items = vec![
            MediaItem::new("/s/Show_S01E01.mp4", 1.0, 0),
            MediaItem::new("/s/Show_S01E01.mkv", 1.0, 0),
        ];
        let groups = group_series(&items);
        let order: Vec<_> = groups[0].episodes.iter().map(|i| i.filename.as_str()).collect();
        assert_eq!(order, vec!["Show_S01E01.mp4", "Show_S01E01.mkv"]);
    }
}
