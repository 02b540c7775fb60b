//! The stored Pokémon record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pokescout_core::PokemonData;
use serde::{Deserialize, Serialize};

/// A scouted Pokémon as persisted locally.
///
/// `id` is `None` until the record has been saved once. `name` is the unique,
/// lowercase lookup key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pokemon {
    pub id: Option<i64>,
    pub name: String,
    pub height: f64,
    pub weight: f64,
    pub base_experience: Option<i64>,
    pub abilities: Vec<String>,
    pub stats: BTreeMap<String, i64>,
    pub types: Vec<String>,
    pub moves: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pokemon {
    /// An unsaved record for `name` built from a fresh upstream fetch. The
    /// upstream's own spelling of the name is not used as the key.
    pub fn from_fetched(name: &str, data: PokemonData) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.to_lowercase(),
            height: data.height,
            weight: data.weight,
            base_experience: data.base_experience,
            abilities: data.abilities,
            stats: data.stats,
            types: data.types,
            moves: data.moves,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every fetched attribute. The name stays put: it is the key the
    /// record was looked up by.
    pub fn apply(&mut self, data: PokemonData) {
        self.height = data.height;
        self.weight = data.weight;
        self.base_experience = data.base_experience;
        self.abilities = data.abilities;
        self.stats = data.stats;
        self.types = data.types;
        self.moves = data.moves;
    }
}
