//! View model types representing renderable catalog state.
//!
//! View models are computed from [`CatalogState`] and consumed by the
//! [`renderer`](crate::ui::renderer). They contain no business logic, only
//! display-ready strings and flags.

use crate::app::CatalogState;
use crate::domain::CityRecord;

/// Detail view of one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityDetail {
    pub name: String,
    pub description: String,
    pub feature: Option<String>,

    /// Formatted as `"Country: XX"`.
    pub country: String,

    /// Formatted as `"Elevation: N meters"`, absent when unknown.
    pub elevation: Option<String>,

    pub wikipedia_url: String,
    pub thumbnail_url: Option<String>,
    pub is_favorite: bool,
}

impl CityDetail {
    #[must_use]
    pub fn from_city(city: &CityRecord, is_favorite: bool) -> Self {
        Self {
            name: city.title.clone(),
            description: city.summary.clone(),
            feature: city.feature.clone(),
            country: format!("Country: {}", city.country_code),
            elevation: city.elevation.map(|meters| format!("Elevation: {meters} meters")),
            wikipedia_url: city.wikipedia_url.clone(),
            thumbnail_url: city.thumbnail_img.clone(),
            is_favorite,
        }
    }
}

/// One row of the search result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// 1-based position shown to the user.
    pub number: usize,
    pub title: String,
    pub country_code: String,
    pub is_selected: bool,
    pub is_favorite: bool,
}

/// One row of the saved-cities list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRow {
    pub title: String,
    pub country_code: String,

    /// Character ranges of `title` matched by the filter, `(start, end)` exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Complete catalog view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogViewModel {
    pub results: Vec<ResultRow>,
    pub favorites: Vec<FavoriteRow>,

    /// Filter applied to `favorites`; empty means unfiltered.
    pub favorites_filter: String,

    /// Message of the latest failed search, if it has not been superseded.
    pub error: Option<String>,
}

impl CatalogViewModel {
    /// Computes the view model, filtering favorites by `favorites_filter`.
    #[must_use]
    pub fn from_state(state: &CatalogState, favorites_filter: &str) -> Self {
        let _span = tracing::debug_span!("compute_viewmodel",
            results = state.results().len(),
            favorites = state.favorites().len()
        )
        .entered();

        let selected = state.selected_index();
        let results = state
            .results()
            .iter()
            .enumerate()
            .map(|(i, city)| ResultRow {
                number: i + 1,
                title: city.title.clone(),
                country_code: city.country_code.clone(),
                is_selected: selected == Some(i),
                is_favorite: state.is_favorite(city),
            })
            .collect();

        let favorites = state
            .filtered_favorites(favorites_filter)
            .into_iter()
            .map(|city| FavoriteRow {
                title: city.title.clone(),
                country_code: city.country_code.clone(),
                highlight_ranges: highlight_ranges(&city.title, favorites_filter),
            })
            .collect();

        Self {
            results,
            favorites,
            favorites_filter: favorites_filter.to_string(),
            error: state.last_error().map(ToString::to_string),
        }
    }
}

/// Merges the matched character indices of every filter token into sorted ranges.
///
/// Indices refer to `title.chars()` as given.
fn highlight_ranges(title: &str, filter: &str) -> Vec<(usize, usize)> {
    use fuzzy_matcher::skim::SkimMatcherV2;
    use fuzzy_matcher::FuzzyMatcher;

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut indices: Vec<usize> = filter
        .split_whitespace()
        .filter_map(|token| matcher.fuzzy_indices(title, token))
        .flat_map(|(_, idx)| idx)
        .collect();
    indices.sort_unstable();
    indices.dedup();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for i in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == i => *end = i + 1,
            _ => ranges.push((i, i + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdentityPolicy;
    use crate::storage::{FavoritesStore, MemoryStore};
    use pretty_assertions::assert_eq;

    #[test]
    fn detail_formats_country_and_elevation() {
        let city = CityRecord::new("Denver", "Mile high city", "US", 39.74, -104.99, "en.wikipedia.org/wiki/Denver")
            .with_feature("city")
            .with_elevation(1609);

        let detail = CityDetail::from_city(&city, true);

        assert_eq!(detail.country, "Country: US");
        assert_eq!(detail.elevation.as_deref(), Some("Elevation: 1609 meters"));
        assert_eq!(detail.feature.as_deref(), Some("city"));
        assert!(detail.is_favorite);
    }

    #[test]
    fn detail_omits_unknown_elevation() {
        let city = CityRecord::new("Atlantis", "", "XX", 0.0, 0.0, "");
        assert_eq!(CityDetail::from_city(&city, false).elevation, None);
    }

    #[test]
    fn rows_mark_selection_and_favorites() {
        let store = FavoritesStore::load(Box::new(MemoryStore::new()), IdentityPolicy::Fresh);
        let mut state = CatalogState::new(store);
        let paris = CityRecord::new("Paris", "", "FR", 48.85, 2.35, "");
        let texas = CityRecord::new("Paris", "", "US", 33.66, -95.55, "");
        state.favorites.add(&texas).unwrap();
        state.replace_results(vec![paris, texas]);

        let vm = CatalogViewModel::from_state(&state, "");

        assert_eq!(
            vm.results.iter().map(|r| (r.number, r.is_selected, r.is_favorite)).collect::<Vec<_>>(),
            vec![(1, true, false), (2, false, true)]
        );
        assert_eq!(vm.favorites.len(), 1);
        assert!(vm.favorites[0].highlight_ranges.is_empty());
    }

    #[test]
    fn highlight_ranges_are_merged() {
        assert_eq!(highlight_ranges("New York", "new"), vec![(0, 3)]);
        assert!(highlight_ranges("New York", "").is_empty());
    }

    #[test]
    fn highlight_indices_follow_the_title_as_written() {
        assert_eq!(highlight_ranges("İstanbul", "stan"), vec![(1, 5)]);
        assert_eq!(highlight_ranges("New York", "NEW"), vec![(0, 3)]);
    }
}
