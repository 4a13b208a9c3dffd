//! Spin-the-wheel recommender: pick a category, then a genre, then a title.

use orrin_models::{MediaCategory, MediaItem};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::catalog::MediaCatalog;

/// Outcome of a full spin
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Spin {
    pub category: MediaCategory,
    pub genre: Option<String>,
    pub item: MediaItem,
    /// True when nothing matched the category/genre and the whole catalog was used
    pub fell_back: bool,
}

pub fn pick_category<R: Rng + ?Sized>(rng: &mut R) -> MediaCategory {
    // ALL is non-empty
    *MediaCategory::ALL.choose(rng).unwrap_or(&MediaCategory::Films)
}

/// Random genre of the category, `None` when its items carry no genres
pub fn pick_genre<C, R>(catalog: &C, category: MediaCategory, rng: &mut R) -> Option<String>
where
    C: MediaCatalog + ?Sized,
    R: Rng + ?Sized,
{
    catalog.genres_for(category).choose(rng).cloned()
}

fn matches_genre(item: &MediaItem, genre: &str) -> bool {
    let needle = genre.to_lowercase();
    item.genres.iter().any(|g| g.to_lowercase().contains(&needle))
        || item.title.to_lowercase().contains(&needle)
        || item
            .description
            .as_deref()
            .map(|d| d.to_lowercase().contains(&needle))
            .unwrap_or(false)
}

/// Random item matching the optional category and genre.
///
/// When no item matches, the pick falls back to the whole catalog; the second
/// tuple field reports that. Only an empty catalog yields `None`.
pub fn pick_item<'a, C, R>(
    catalog: &'a C,
    category: Option<MediaCategory>,
    genre: Option<&str>,
    rng: &mut R,
) -> Option<(&'a MediaItem, bool)>
where
    C: MediaCatalog + ?Sized,
    R: Rng + ?Sized,
{
    let candidates: Vec<&MediaItem> = catalog
        .list_all()
        .iter()
        .filter(|item| category.map_or(true, |c| item.category() == c))
        .filter(|item| genre.map_or(true, |g| matches_genre(item, g)))
        .collect();

    debug!(?category, ?genre, candidates = candidates.len(), "Picking item");

    if let Some(item) = candidates.choose(rng) {
        return Some((*item, false));
    }

    catalog.list_all().choose(rng).map(|item| (item, true))
}

/// Run all three stages. Stages given explicitly are used as-is; the genre
/// stage is skipped when the category has no genres.
pub fn spin<C, R>(
    catalog: &C,
    category: Option<MediaCategory>,
    genre: Option<String>,
    rng: &mut R,
) -> Option<Spin>
where
    C: MediaCatalog + ?Sized,
    R: Rng + ?Sized,
{
    let category = category.unwrap_or_else(|| pick_category(rng));
    let genre = genre.or_else(|| pick_genre(catalog, category, rng));
    let (item, fell_back) = pick_item(catalog, Some(category), genre.as_deref(), rng)?;

    Some(Spin {
        category,
        genre,
        item: item.clone(),
        fell_back,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use orrin_models::MediaType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            MediaItem::new("m1", "Heat", MediaType::Film).with_genres(["Crime", "Thriller"]),
            MediaItem::new("m2", "Paddington", MediaType::Film).with_genres(["Family"]),
            MediaItem::new("s1", "Dark", MediaType::Show).with_genres(["Science Fiction"]),
            MediaItem::new("d1", "Crime Scene", MediaType::Documentary),
        ])
    }

    #[test]
    fn test_pick_item_respects_category_and_genre() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let (item, fell_back) =
                pick_item(&catalog, Some(MediaCategory::Films), Some("crime"), &mut rng).unwrap();
            assert_eq!(item.id, "m1");
            assert!(!fell_back);
        }
    }

    #[test]
    fn test_genre_matches_title_substring() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(1);

        let (item, _) =
            pick_item(&catalog, Some(MediaCategory::Documentaries), Some("Crime"), &mut rng).unwrap();
        assert_eq!(item.id, "d1");
    }

    #[test]
    fn test_pick_item_falls_back_to_whole_catalog() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(3);

        let (item, fell_back) = pick_item(&catalog, Some(MediaCategory::Anime), None, &mut rng).unwrap();
        assert!(fell_back);
        assert!(catalog.find(&item.id).is_some());
    }

    #[test]
    fn test_pick_item_empty_catalog() {
        let catalog = StaticCatalog::default();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(pick_item(&catalog, None, None, &mut rng).is_none());
        assert!(spin(&catalog, None, None, &mut rng).is_none());
    }

    #[test]
    fn test_pick_genre_only_from_category() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let genre = pick_genre(&catalog, MediaCategory::Films, &mut rng).unwrap();
            assert!(["Crime", "Family", "Thriller"].contains(&genre.as_str()));
        }
        assert!(pick_genre(&catalog, MediaCategory::Documentaries, &mut rng).is_none());
    }

    #[test]
    fn test_spin_with_fixed_category_skips_missing_genres() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(5);

        let result = spin(&catalog, Some(MediaCategory::Documentaries), None, &mut rng).unwrap();
        assert_eq!(result.category, MediaCategory::Documentaries);
        assert_eq!(result.genre, None);
        assert_eq!(result.item.id, "d1");
        assert!(!result.fell_back);
    }

    #[test]
    fn test_spin_random_category_is_valid() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            let result = spin(&catalog, None, None, &mut rng).unwrap();
            assert!(MediaCategory::ALL.contains(&result.category));
            if !result.fell_back {
                assert_eq!(result.item.category(), result.category);
            }
        }
    }
}
