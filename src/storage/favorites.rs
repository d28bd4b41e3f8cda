//! Durable favorites set.
//!
//! [`FavoritesStore`] keeps the user's favorite cities in insertion order, unique by
//! [`CityId`](crate::domain::CityId), and writes the whole set as one JSON blob under
//! [`FAVORITES_KEY`] after every mutation.
//!
//! Loading is best-effort: a missing or undecodable blob yields an empty set and a
//! log line, never an error. Persisting reports its outcome to the caller, which
//! decides how to surface it; the in-memory set is never rolled back.

use crate::domain::city::{decode_city_list, encode_city_list};
use crate::domain::error::{CityfinderError, Result};
use crate::domain::{CityRecord, IdentityPolicy};
use crate::storage::backend::KeyValueStore;

/// Storage key the favorites blob is written under.
pub const FAVORITES_KEY: &str = "favoriteCities";

/// Ordered favorites set backed by a key-value store.
pub struct FavoritesStore {
    storage: Box<dyn KeyValueStore>,
    cities: Vec<CityRecord>,
}

impl FavoritesStore {
    /// Loads the favorites set from `storage`.
    ///
    /// Identifiers for restored records are assigned by `policy`.
    pub fn load(storage: Box<dyn KeyValueStore>, policy: IdentityPolicy) -> Self {
        let _span = tracing::debug_span!("favorites_load").entered();

        let cities = match storage.get(FAVORITES_KEY) {
            Ok(Some(blob)) => match decode_city_list(&blob, policy) {
                Ok(cities) => {
                    tracing::info!(
                        count = cities.len(),
                        titles = ?cities.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
                        "loaded favorite cities"
                    );
                    cities
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to decode favorite cities, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                tracing::debug!("no favorite cities stored");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read favorite cities, starting empty");
                Vec::new()
            }
        };

        Self { storage, cities }
    }

    /// Adds `city` and persists, unless a favorite with the same identifier exists.
    ///
    /// A duplicate is a no-op and writes nothing. After an insert the set stays
    /// updated even if the write fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the set could not be written to storage.
    pub fn add(&mut self, city: &CityRecord) -> Result<()> {
        if self.contains(city) {
            tracing::debug!(city_id = %city.id(), "city already a favorite");
            return Ok(());
        }
        tracing::debug!(city_id = %city.id(), title = %city.title, "adding favorite");
        self.cities.push(city.clone());
        self.persist()
    }

    /// Removes every favorite sharing `city`'s identifier, then persists.
    ///
    /// Persists even when nothing was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the set could not be written to storage.
    pub fn remove(&mut self, city: &CityRecord) -> Result<()> {
        let id = city.id();
        let before = self.cities.len();
        self.cities.retain(|c| c.id() != id);
        tracing::debug!(city_id = %id, removed = before - self.cities.len(), "removing favorite");
        self.persist()
    }

    /// Serializes the whole set and overwrites the stored blob.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn persist(&mut self) -> Result<()> {
        let blob = encode_city_list(&self.cities)
            .map_err(|e| CityfinderError::Storage(format!("failed to encode favorites: {e}")))?;
        self.storage.set(FAVORITES_KEY, &blob)?;
        tracing::debug!(count = self.cities.len(), "saved favorite cities");
        Ok(())
    }

    /// Membership test by identifier.
    #[must_use]
    pub fn contains(&self, city: &CityRecord) -> bool {
        let id = city.id();
        self.cities.iter().any(|c| c.id() == id)
    }

    /// Favorites in insertion order.
    #[must_use]
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("cities", &self.cities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn city(title: &str) -> CityRecord {
        CityRecord::new(title, format!("About {title}"), "FR", 48.0, 2.0, format!("wiki/{title}"))
    }

    #[test]
    fn add_is_unique_by_id_and_persists() {
        let backing = MemoryStore::new();
        let mut favorites = FavoritesStore::load(Box::new(backing.clone()), IdentityPolicy::Fresh);
        let paris = city("Paris");

        favorites.add(&paris).unwrap();
        favorites.add(&paris).unwrap();

        assert_eq!(favorites.len(), 1);
        let blob = backing.get(FAVORITES_KEY).unwrap().unwrap();
        let stored = decode_city_list(&blob, IdentityPolicy::Fresh).unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].same_content(&paris));
    }

    #[test]
    fn duplicate_add_writes_nothing() {
        let backing = MemoryStore::new();
        let mut favorites = FavoritesStore::load(Box::new(backing.clone()), IdentityPolicy::Fresh);
        let paris = city("Paris");
        favorites.add(&paris).unwrap();

        backing.set_fail_writes(true);
        favorites.add(&paris).unwrap();

        assert_eq!(favorites.len(), 1);
        assert!(favorites.add(&city("Lyon")).is_err());
        assert_eq!(favorites.len(), 2);
    }

    #[test]
    fn identical_content_with_distinct_ids_are_distinct_members() {
        let mut favorites = FavoritesStore::load(Box::new(MemoryStore::new()), IdentityPolicy::Fresh);
        let first = city("Paris");
        let second = city("Paris");

        favorites.add(&first).unwrap();
        favorites.add(&second).unwrap();

        assert_eq!(favorites.len(), 2);
        assert!(favorites.contains(&first));
        assert!(favorites.contains(&second));
    }

    #[test]
    fn remove_persists_even_when_absent() {
        let backing = MemoryStore::new();
        let mut favorites = FavoritesStore::load(Box::new(backing.clone()), IdentityPolicy::Fresh);

        favorites.remove(&city("Nowhere")).unwrap();

        assert_eq!(backing.get(FAVORITES_KEY).unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn undecodable_blob_starts_empty() {
        let mut backing = MemoryStore::new();
        backing.set(FAVORITES_KEY, b"{\"oops\":true}").unwrap();

        let favorites = FavoritesStore::load(Box::new(backing), IdentityPolicy::Fresh);
        assert!(favorites.is_empty());
    }

    #[test]
    fn persist_failure_is_reported_without_rollback() {
        let backing = MemoryStore::new();
        let mut favorites = FavoritesStore::load(Box::new(backing.clone()), IdentityPolicy::Fresh);
        let paris = city("Paris");

        backing.set_fail_writes(true);
        assert!(favorites.add(&paris).is_err());
        assert!(favorites.contains(&paris));
        assert_eq!(backing.get(FAVORITES_KEY).unwrap(), None);
    }
}
