//! Event handling and state transition logic.
//!
//! This module implements the handler that processes catalog requests and worker
//! completions, translating them into state changes and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the catalog API or the search worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur on [`CatalogState`]
//! 4. Actions are collected and returned for execution
//!
//! Every `Publish` action is returned after the mutation it describes, and a
//! search's `Complete` action always comes last.

use crate::app::events::CatalogEvent;
use crate::app::{Action, CatalogState};
use crate::domain::error::Result;
use crate::domain::CityRecord;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Requests and completions processed by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Starts a remote search for `query`.
    Search {
        query: String,
    },

    /// Adds `city` to favorites, or removes it if already present.
    ToggleFavorite(CityRecord),

    /// Selects the result at the given index.
    Select(usize),

    /// Wraps a completion from the search worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates state, and returns actions to execute.
///
/// The boolean is `true` when observable state changed.
///
/// # Errors
///
/// Reserved for failures that must abort the caller; storage problems are turned
/// into `PersistFailed` events instead.
pub fn handle_event(state: &mut CatalogState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::Search { query } => {
            let seq = state.next_seq();
            tracing::debug!(seq = seq, query = %query, "search issued");
            Ok((false, vec![Action::PostToWorker(WorkerMessage::search(seq, query.clone()))]))
        }
        Event::ToggleFavorite(city) => {
            let was_favorite = state.favorites.contains(city);
            let outcome = if was_favorite {
                state.favorites.remove(city)
            } else {
                state.favorites.add(city)
            };

            tracing::debug!(
                city_id = %city.id(),
                title = %city.title,
                favorite = !was_favorite,
                "favorite toggled"
            );

            let mut actions = vec![Action::Publish(CatalogEvent::FavoritesChanged {
                favorites: state.favorites.cities().to_vec(),
            })];

            if let Err(e) = outcome {
                tracing::warn!(error = %e, "failed to save favorite cities");
                actions.push(Action::Publish(CatalogEvent::PersistFailed {
                    message: e.to_string(),
                }));
            }

            Ok((true, actions))
        }
        Event::Select(index) => {
            if *index >= state.results.len() {
                tracing::debug!(index = index, len = state.results.len(), "selection out of range");
                return Ok((false, vec![]));
            }
            if state.selected == Some(*index) {
                return Ok((false, vec![]));
            }

            state.selected = Some(*index);
            Ok((true, vec![selection_event(state)]))
        }
        Event::WorkerResponse(WorkerResponse::SearchCompleted { seq, query, result }) => {
            let seq = *seq;
            let mut actions = vec![];
            let mut changed = false;

            if seq == state.latest_seq {
                match result {
                    Ok(cities) => {
                        tracing::debug!(seq = seq, count = cities.len(), "applying search results");
                        state.replace_results(cities.clone());
                        actions.push(Action::Publish(CatalogEvent::ResultsReplaced {
                            seq,
                            cities: cities.clone(),
                        }));
                        actions.push(selection_event(state));
                    }
                    Err(error) => {
                        tracing::debug!(seq = seq, error = %error, "search failed, keeping previous results");
                        state.last_error = Some(error.clone());
                        actions.push(Action::Publish(CatalogEvent::SearchFailed {
                            seq,
                            query: query.clone(),
                            error: error.clone(),
                        }));
                    }
                }
                changed = true;
            } else {
                tracing::debug!(
                    seq = seq,
                    latest_seq = state.latest_seq,
                    "discarding stale search completion"
                );
            }

            actions.push(Action::Complete {
                seq,
                result: result.clone(),
            });
            Ok((changed, actions))
        }
    }
}

fn selection_event(state: &CatalogState) -> Action {
    Action::Publish(CatalogEvent::SelectionChanged {
        index: state.selected,
        city: state.selected().cloned(),
    })
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Search { .. } => "Search",
        Event::ToggleFavorite(_) => "ToggleFavorite",
        Event::Select(_) => "Select",
        Event::WorkerResponse(_) => "WorkerResponse",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IdentityPolicy, SearchError};
    use crate::storage::{FavoritesStore, MemoryStore};
    use pretty_assertions::assert_eq;

    fn city(title: &str) -> CityRecord {
        CityRecord::new(title, "", "XX", 1.0, 2.0, "")
    }

    fn state_with(store: MemoryStore) -> CatalogState {
        CatalogState::new(FavoritesStore::load(Box::new(store), IdentityPolicy::Fresh))
    }

    fn completed(seq: u64, result: std::result::Result<Vec<CityRecord>, SearchError>) -> Event {
        Event::WorkerResponse(WorkerResponse::SearchCompleted {
            seq,
            query: "q".to_string(),
            result,
        })
    }

    #[test]
    fn search_posts_numbered_message() {
        let mut state = state_with(MemoryStore::new());

        let (_, first) = handle_event(&mut state, &Event::Search { query: "Paris".into() }).unwrap();
        let (_, second) = handle_event(&mut state, &Event::Search { query: "Lyon".into() }).unwrap();

        assert_eq!(first, vec![Action::PostToWorker(WorkerMessage::search(1, "Paris"))]);
        assert_eq!(second, vec![Action::PostToWorker(WorkerMessage::search(2, "Lyon"))]);
    }

    #[test]
    fn latest_success_replaces_results_then_completes() {
        let mut state = state_with(MemoryStore::new());
        handle_event(&mut state, &Event::Search { query: "Paris".into() }).unwrap();
        let cities = vec![city("Paris"), city("Paris, Texas")];

        let (changed, actions) = handle_event(&mut state, &completed(1, Ok(cities.clone()))).unwrap();

        assert!(changed);
        assert_eq!(state.results(), cities.as_slice());
        assert_eq!(state.selected_index(), Some(0));
        assert_eq!(
            actions,
            vec![
                Action::Publish(CatalogEvent::ResultsReplaced { seq: 1, cities: cities.clone() }),
                Action::Publish(CatalogEvent::SelectionChanged {
                    index: Some(0),
                    city: Some(cities[0].clone()),
                }),
                Action::Complete { seq: 1, result: Ok(cities) },
            ]
        );
    }

    #[test]
    fn failure_keeps_previous_results() {
        let mut state = state_with(MemoryStore::new());
        handle_event(&mut state, &Event::Search { query: "Paris".into() }).unwrap();
        handle_event(&mut state, &completed(1, Ok(vec![city("Paris")]))).unwrap();
        let before = state.results().to_vec();

        handle_event(&mut state, &Event::Search { query: "Lyon".into() }).unwrap();
        let error = SearchError::BadResponse { status: 500 };
        let (_, actions) = handle_event(&mut state, &completed(2, Err(error.clone()))).unwrap();

        assert_eq!(state.results(), before.as_slice());
        assert_eq!(state.last_error(), Some(&error));
        assert_eq!(actions.last(), Some(&Action::Complete { seq: 2, result: Err(error) }));
    }

    #[test]
    fn stale_completion_only_completes() {
        let mut state = state_with(MemoryStore::new());
        handle_event(&mut state, &Event::Search { query: "Par".into() }).unwrap();
        handle_event(&mut state, &Event::Search { query: "Paris".into() }).unwrap();

        let newer = vec![city("Paris")];
        handle_event(&mut state, &completed(2, Ok(newer.clone()))).unwrap();

        let stale = vec![city("Parma")];
        let (changed, actions) = handle_event(&mut state, &completed(1, Ok(stale.clone()))).unwrap();

        assert!(!changed);
        assert_eq!(state.results(), newer.as_slice());
        assert_eq!(actions, vec![Action::Complete { seq: 1, result: Ok(stale) }]);
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let mut state = state_with(MemoryStore::new());
        let rome = city("Rome");

        handle_event(&mut state, &Event::ToggleFavorite(rome.clone())).unwrap();
        assert!(state.is_favorite(&rome));

        handle_event(&mut state, &Event::ToggleFavorite(rome.clone())).unwrap();
        assert!(!state.is_favorite(&rome));
    }

    #[test]
    fn persist_failure_is_published_not_raised() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut state = state_with(store);
        let rome = city("Rome");

        let (changed, actions) = handle_event(&mut state, &Event::ToggleFavorite(rome.clone())).unwrap();

        assert!(changed);
        assert!(state.is_favorite(&rome));
        assert_eq!(
            actions[0],
            Action::Publish(CatalogEvent::FavoritesChanged { favorites: vec![rome] })
        );
        assert!(matches!(actions[1], Action::Publish(CatalogEvent::PersistFailed { .. })));
    }

    #[test]
    fn select_ignores_out_of_range_and_unchanged() {
        let mut state = state_with(MemoryStore::new());
        handle_event(&mut state, &Event::Search { query: "x".into() }).unwrap();
        handle_event(&mut state, &completed(1, Ok(vec![city("A"), city("B")]))).unwrap();

        assert_eq!(handle_event(&mut state, &Event::Select(5)).unwrap(), (false, vec![]));
        assert_eq!(handle_event(&mut state, &Event::Select(0)).unwrap(), (false, vec![]));

        let (changed, _) = handle_event(&mut state, &Event::Select(1)).unwrap();
        assert!(changed);
        assert_eq!(state.selected().map(|c| c.title.as_str()), Some("B"));
    }
}
