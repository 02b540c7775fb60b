//! A stand-in for the upstream Pokémon API.
//!
//! Serves `GET /pokemon/{name}` from an in-memory registry of upstream-shaped
//! JSON documents and counts the lookups it receives, so tests can assert how
//! often the scout went to the network.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, RwLock,
    },
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Shared registry of upstream documents plus a request counter.
#[derive(Clone, Default)]
pub struct Registry {
    pokemon: Arc<RwLock<HashMap<String, Value>>>,
    hits: Arc<AtomicUsize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the names the scout syncs by default.
    pub fn seeded() -> Self {
        let registry = Self::new();
        registry.insert(fixture("pikachu", 4, 60, 112));
        registry.insert(fixture("dhelmise", 39, 2100, 181));
        registry.insert(fixture("charizard", 17, 905, 267));
        registry.insert(fixture("parasect", 10, 295, 142));
        registry.insert(fixture("aerodactyl", 18, 590, 180));
        registry.insert(fixture("kingler", 13, 600, 166));
        registry.insert(fixture("bulbasaur", 7, 69, 64));
        registry
    }

    /// Insert or replace a document, keyed by its `name` field.
    pub fn insert(&self, document: Value) {
        let name = document["name"].as_str().unwrap_or_default().to_string();
        self.pokemon
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name, document);
    }

    pub fn remove(&self, name: &str) {
        self.pokemon
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name);
    }

    /// Number of `GET /pokemon/{name}` requests served so far, hits and misses.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Build an upstream-shaped document. `height` and `weight` are in tenths.
pub fn fixture(name: &str, height: u32, weight: u32, base_experience: i64) -> Value {
    json!({
        "id": 0,
        "name": name,
        "height": height,
        "weight": weight,
        "base_experience": base_experience,
        "is_default": true,
        "abilities": [
            {"ability": {"name": format!("{name}-ability"), "url": ""}, "is_hidden": false, "slot": 1}
        ],
        "stats": [
            {"base_stat": 50, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": ""}}
        ],
        "types": [
            {"slot": 1, "type": {"name": "normal", "url": ""}}
        ],
        "moves": [
            {"move": {"name": "tackle", "url": ""}, "version_group_details": []},
            {"move": {"name": "growl", "url": ""}, "version_group_details": []}
        ]
    })
}

pub fn app() -> Router {
    app_with(Registry::seeded())
}

pub fn app_with(registry: Registry) -> Router {
    Router::new()
        .route("/pokemon/{name}", get(get_pokemon))
        .with_state(registry)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, registry: Registry) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(registry)).await
}

async fn get_pokemon(
    State(registry): State<Registry>,
    Path(name): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    registry.hits.fetch_add(1, Ordering::SeqCst);
    let pokemon = registry.pokemon.read().unwrap_or_else(|e| e.into_inner());
    pokemon
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
