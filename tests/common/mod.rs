//! Shared fixtures for integration tests.

#![allow(dead_code)]

use cityfinder::remote::{HttpReply, SearchTransport};
use cityfinder::storage::{KeyValueStore, MemoryStore};
use cityfinder::{CatalogService, Config, IdentityPolicy, SearchError};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use url::Url;

pub const PARIS_TWO: &str = r#"{"geonames":[
    {"title":"Paris","summary":"Capital of France","feature":"city","countryCode":"FR","elevation":35,
     "lat":48.8567,"lng":2.3508,"wikipediaUrl":"en.wikipedia.org/wiki/Paris",
     "thumbnailImg":"http://www.geonames.org/img/wikipedia/38000/thumb-37521-100.jpg"},
    {"title":"Paris, Texas","summary":"City in Lamar County","countryCode":"US",
     "lat":33.6609,"lng":-95.5555,"wikipediaUrl":"en.wikipedia.org/wiki/Paris,_Texas"}
]}"#;

pub const LYON_ONE: &str = r#"{"geonames":[
    {"title":"Lyon","summary":"Third-largest city of France","countryCode":"FR",
     "lat":45.76,"lng":4.84,"wikipediaUrl":"en.wikipedia.org/wiki/Lyon"}
]}"#;

struct Script {
    reply: Result<HttpReply, SearchError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Transport answering from replies scripted per query string.
///
/// Each scripted reply is used once; unscripted queries get a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, Script>>,
    requests: Mutex<Vec<Url>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, query: &str, status: u16, body: &str) {
        self.scripts.lock().unwrap().insert(
            query.to_string(),
            Script {
                reply: Ok(HttpReply::new(status, body)),
                gate: None,
            },
        );
    }

    pub fn fail(&self, query: &str, error: SearchError) {
        self.scripts
            .lock()
            .unwrap()
            .insert(query.to_string(), Script { reply: Err(error), gate: None });
    }

    /// Scripts a reply that is held back until the returned sender fires.
    pub fn gated_reply(&self, query: &str, status: u16, body: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.scripts.lock().unwrap().insert(
            query.to_string(),
            Script {
                reply: Ok(HttpReply::new(status, body)),
                gate: Some(rx),
            },
        );
        tx
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }
}

impl SearchTransport for ScriptedTransport {
    fn get(&self, url: Url) -> BoxFuture<'static, Result<HttpReply, SearchError>> {
        let query = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        self.requests.lock().unwrap().push(url);
        let script = self.scripts.lock().unwrap().remove(&query);

        Box::pin(async move {
            match script {
                Some(Script { reply, gate }) => {
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    reply
                }
                None => Ok(HttpReply::new(404, "")),
            }
        })
    }
}

/// Collects every outcome a search callback receives.
#[derive(Clone, Default)]
pub struct Outcomes(Arc<Mutex<Vec<Result<Vec<String>, SearchError>>>>);

impl Outcomes {
    pub fn callback(&self) -> impl FnOnce(Result<Vec<cityfinder::CityRecord>, SearchError>) + Send + 'static {
        let sink = self.0.clone();
        move |outcome| {
            sink.lock()
                .unwrap()
                .push(outcome.map(|cities| cities.into_iter().map(|c| c.title).collect()));
        }
    }

    pub fn all(&self) -> Vec<Result<Vec<String>, SearchError>> {
        self.0.lock().unwrap().clone()
    }
}

pub fn catalog_with(
    transport: Arc<ScriptedTransport>,
    storage: impl KeyValueStore + 'static,
    identity: IdentityPolicy,
) -> CatalogService {
    let config = Config {
        identity,
        ..Config::default()
    };
    CatalogService::with_storage(&config, Box::new(storage), transport).unwrap()
}

pub fn catalog(transport: Arc<ScriptedTransport>) -> CatalogService {
    catalog_with(transport, MemoryStore::new(), IdentityPolicy::Fresh)
}
