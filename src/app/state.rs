//! Catalog state container.
//!
//! [`CatalogState`] is the single source of truth for everything observers see:
//! the current search result set, the selected city, the favorites set, and the
//! bookkeeping needed to discard stale search completions.
//!
//! # State Components
//!
//! - **Results**: output of the most recent applied search, replaced wholesale
//! - **Selection**: index into the results, reset to the first hit on every
//!   applied search
//! - **Favorites**: durable set owned through [`FavoritesStore`]
//! - **Sequence numbers**: the latest search issued; completions for older
//!   requests never touch the results
//!
//! The state is mutated only by [`handle_event`](crate::app::handle_event), always
//! from the task that owns the catalog.

use crate::domain::{CityRecord, SearchError};
use crate::storage::FavoritesStore;
use crate::worker::SearchSeq;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Central catalog state.
#[derive(Debug)]
pub struct CatalogState {
    /// Result set of the latest applied search.
    pub(crate) results: Vec<CityRecord>,

    /// Index of the selected city within `results`.
    pub(crate) selected: Option<usize>,

    /// Durable favorites.
    pub(crate) favorites: FavoritesStore,

    /// Number of the most recently issued search; 0 before the first search.
    pub(crate) latest_seq: SearchSeq,

    /// Failure of the latest search, cleared by the next successful one.
    pub(crate) last_error: Option<SearchError>,
}

impl CatalogState {
    /// Creates a state with empty results around an already loaded favorites set.
    #[must_use]
    pub fn new(favorites: FavoritesStore) -> Self {
        Self {
            results: Vec::new(),
            selected: None,
            favorites,
            latest_seq: 0,
            last_error: None,
        }
    }

    #[must_use]
    pub fn results(&self) -> &[CityRecord] {
        &self.results
    }

    #[must_use]
    pub fn favorites(&self) -> &[CityRecord] {
        self.favorites.cities()
    }

    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Returns the selected city, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&CityRecord> {
        self.selected.and_then(|i| self.results.get(i))
    }

    #[must_use]
    pub const fn latest_seq(&self) -> SearchSeq {
        self.latest_seq
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&SearchError> {
        self.last_error.as_ref()
    }

    /// Membership test by identifier against the favorites set.
    #[must_use]
    pub fn is_favorite(&self, city: &CityRecord) -> bool {
        self.favorites.contains(city)
    }

    /// Issues the next search sequence number.
    pub(crate) fn next_seq(&mut self) -> SearchSeq {
        self.latest_seq += 1;
        self.latest_seq
    }

    /// Withdraws `seq` if it is still the latest number, for a search that was never
    /// sent. Completions of earlier searches then count as current again.
    pub(crate) fn withdraw_seq(&mut self, seq: SearchSeq) {
        if self.latest_seq == seq {
            self.latest_seq = seq.saturating_sub(1);
        }
    }

    /// Replaces the result set and selects its first entry.
    pub(crate) fn replace_results(&mut self, cities: Vec<CityRecord>) {
        self.selected = if cities.is_empty() { None } else { Some(0) };
        self.results = cities;
        self.last_error = None;
    }

    /// Favorites whose titles fuzzy-match every whitespace-separated token of `query`.
    ///
    /// An empty query returns all favorites in insertion order.
    #[must_use]
    pub fn filtered_favorites(&self, query: &str) -> Vec<&CityRecord> {
        use fuzzy_matcher::FuzzyMatcher;

        let _span = tracing::debug_span!("filter_favorites",
            total = self.favorites.len(),
            query_len = query.len()
        )
        .entered();

        let tokens: Vec<&str> = query.split_whitespace().collect();
        if tokens.is_empty() {
            return self.favorites.cities().iter().collect();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let filtered: Vec<&CityRecord> = self
            .favorites
            .cities()
            .iter()
            .filter(|city| tokens.iter().all(|token| matcher.fuzzy_match(&city.title, token).is_some()))
            .collect();

        tracing::debug!(filtered_count = filtered.len(), "favorites filter applied");
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdentityPolicy;
    use crate::storage::MemoryStore;

    fn city(title: &str) -> CityRecord {
        CityRecord::new(title, "", "XX", 0.0, 0.0, "")
    }

    fn state() -> CatalogState {
        CatalogState::new(FavoritesStore::load(Box::new(MemoryStore::new()), IdentityPolicy::Fresh))
    }

    #[test]
    fn replacing_results_selects_first_hit() {
        let mut state = state();
        state.replace_results(vec![city("Rome"), city("Romeoville")]);
        assert_eq!(state.selected().map(|c| c.title.as_str()), Some("Rome"));

        state.replace_results(vec![]);
        assert!(state.selected().is_none());
    }

    #[test]
    fn sequence_numbers_increase() {
        let mut state = state();
        assert_eq!(state.latest_seq(), 0);
        assert_eq!(state.next_seq(), 1);
        assert_eq!(state.next_seq(), 2);
        assert_eq!(state.latest_seq(), 2);
    }

    #[test]
    fn withdrawing_only_rewinds_the_latest_number() {
        let mut state = state();
        state.next_seq();
        state.next_seq();

        state.withdraw_seq(1);
        assert_eq!(state.latest_seq(), 2);

        state.withdraw_seq(2);
        assert_eq!(state.latest_seq(), 1);
    }

    #[test]
    fn favorites_filter_matches_all_tokens() {
        let mut state = state();
        for title in ["New York City", "York", "Newcastle upon Tyne"] {
            state.favorites.add(&city(title)).unwrap();
        }

        let titles = |q: &str| -> Vec<String> {
            state.filtered_favorites(q).iter().map(|c| c.title.clone()).collect()
        };

        assert_eq!(titles(""), vec!["New York City", "York", "Newcastle upon Tyne"]);
        assert_eq!(titles("york"), vec!["New York City", "York"]);
        assert_eq!(titles("new york"), vec!["New York City"]);
        assert_eq!(titles("YORK"), vec!["New York City", "York"]);
        assert!(titles("zzz").is_empty());
    }
}
