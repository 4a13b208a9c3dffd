use orrin_models::{MediaCategory, MediaItem, StatusLabel};
use serde::{Deserialize, Serialize};

use crate::store::ListStore;

/// Profile statistics derived from the Watched buckets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WatchStats {
    pub films: usize,
    pub shows: usize,
    pub anime: usize,
    pub documentaries: usize,
    pub episodes: u32,
    pub runtime_minutes: u32,
    /// Items currently being watched, all categories
    pub in_progress: usize,
}

/// Minutes in a runtime string such as "2h 10m", "95m" or "45m / ep".
/// Only the part before the first `/` counts. Absurd values saturate at `u32::MAX`.
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    let base = runtime.split('/').next().unwrap_or("").to_lowercase();
    let mut minutes = 0;
    let mut digits = String::new();

    for ch in base.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if !digits.is_empty() {
            // Only overflow can fail here, the buffer holds ASCII digits
            let value: u32 = digits.parse().unwrap_or(u32::MAX);
            match ch {
                'h' => minutes = value.saturating_mul(60).saturating_add(minutes),
                'm' => minutes = value.saturating_add(minutes),
                _ => {}
            }
            if !ch.is_whitespace() {
                digits.clear();
            }
        }
    }
    minutes
}

/// Episodes an item contributes; episodic items count at least one
fn episode_count(item: &MediaItem) -> u32 {
    if item.media_type.is_episodic() {
        item.episodes.unwrap_or(1).max(1)
    } else {
        0
    }
}

fn item_runtime(item: &MediaItem) -> u32 {
    let per_unit = item.runtime.as_deref().map(parse_runtime_minutes).unwrap_or(0);
    if item.media_type.is_episodic() {
        per_unit.saturating_mul(episode_count(item))
    } else {
        per_unit
    }
}

impl WatchStats {
    pub fn from_store(store: &ListStore) -> Self {
        let mut stats = WatchStats::default();

        for category in MediaCategory::ALL {
            if let Some(watched) = store.bucket(category, StatusLabel::Watched) {
                match category {
                    MediaCategory::Films => stats.films = watched.count(),
                    MediaCategory::Shows => stats.shows = watched.count(),
                    MediaCategory::Anime => stats.anime = watched.count(),
                    MediaCategory::Documentaries => stats.documentaries = watched.count(),
                }
                for item in watched.items() {
                    stats.episodes = stats.episodes.saturating_add(episode_count(item));
                    stats.runtime_minutes = stats.runtime_minutes.saturating_add(item_runtime(item));
                }
            }

            stats.in_progress += store
                .bucket(category, StatusLabel::CurrentlyWatching)
                .map(|bucket| bucket.count())
                .unwrap_or(0);
        }

        stats
    }

    pub fn total_watched(&self) -> usize {
        self.films + self.shows + self.anime + self.documentaries
    }

    /// Watch time as "{hours}h {minutes}m"
    pub fn tv_time(&self) -> String {
        format!("{}h {}m", self.runtime_minutes / 60, self.runtime_minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrin_models::MediaType;

    #[test]
    fn test_parse_runtime_minutes() {
        assert_eq!(parse_runtime_minutes("2h 10m"), 130);
        assert_eq!(parse_runtime_minutes("95m"), 95);
        assert_eq!(parse_runtime_minutes("1H"), 60);
        assert_eq!(parse_runtime_minutes("45m / ep"), 45);
        assert_eq!(parse_runtime_minutes("1 h 5 m"), 65);
        assert_eq!(parse_runtime_minutes("unknown"), 0);
        assert_eq!(parse_runtime_minutes(""), 0);
    }

    #[test]
    fn test_stats_from_watched_buckets() {
        let mut store = ListStore::new();
        let heat = MediaItem::new("m1", "Heat", MediaType::Film).with_runtime("2h 50m");
        let dark = MediaItem::new("s1", "Dark", MediaType::Show)
            .with_runtime("50m / ep")
            .with_episodes(26);
        let frieren = MediaItem::new("a1", "Frieren", MediaType::Anime).with_runtime("24m");
        let alien = MediaItem::new("m2", "Alien", MediaType::Film);

        store.move_to_status(MediaCategory::Films, StatusLabel::Watched, heat).unwrap();
        store.move_to_status(MediaCategory::Shows, StatusLabel::Watched, dark).unwrap();
        store.move_to_status(MediaCategory::Anime, StatusLabel::Watched, frieren).unwrap();
        store.move_to_status(MediaCategory::Films, StatusLabel::CurrentlyWatching, alien).unwrap();

        let stats = WatchStats::from_store(&store);
        assert_eq!(stats.films, 1);
        assert_eq!(stats.shows, 1);
        assert_eq!(stats.anime, 1);
        assert_eq!(stats.documentaries, 0);
        assert_eq!(stats.episodes, 27);
        assert_eq!(stats.runtime_minutes, 170 + 50 * 26 + 24);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.total_watched(), 3);
    }

    #[test]
    fn test_huge_runtimes_saturate() {
        assert_eq!(parse_runtime_minutes("99999999h"), u32::MAX);
        assert_eq!(parse_runtime_minutes("99999999999999999999m"), u32::MAX);
        assert_eq!(parse_runtime_minutes("4294967295m 1m"), u32::MAX);

        let mut store = ListStore::new();
        let endless = MediaItem::new("s1", "Endless", MediaType::Show)
            .with_runtime("99999h / ep")
            .with_episodes(u32::MAX);
        let film = MediaItem::new("m1", "Long", MediaType::Film).with_runtime("99999999h");
        store.move_to_status(MediaCategory::Shows, StatusLabel::Watched, endless).unwrap();
        store.move_to_status(MediaCategory::Films, StatusLabel::Watched, film).unwrap();

        let stats = WatchStats::from_store(&store);
        assert_eq!(stats.runtime_minutes, u32::MAX);
        assert_eq!(stats.episodes, u32::MAX);
        assert!(stats.tv_time().starts_with(&format!("{}h", u32::MAX / 60)));
    }

    #[test]
    fn test_tv_time_format() {
        let stats = WatchStats {
            runtime_minutes: 125,
            ..WatchStats::default()
        };
        assert_eq!(stats.tv_time(), "2h 5m");
        assert_eq!(WatchStats::default().tv_time(), "0h 0m");
    }
}
