//! Upstream payload shapes and the normalised record they convert into.
//!
//! Only the consumed fields are modelled; everything else in the upstream
//! document is ignored by serde. Nested lists default to empty when absent.

use std::collections::BTreeMap;

use serde::Deserialize;

/// `{ "name": ..., "url": ... }` reference object used throughout the upstream API.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub base_stat: i64,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub entry: NamedResource,
}

/// The subset of `GET /pokemon/{name}` that the scout consumes.
///
/// `height` is in decimeters and `weight` in hectograms.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPokemon {
    pub name: String,
    pub height: f64,
    pub weight: f64,
    #[serde(default)]
    pub base_experience: Option<i64>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
}

/// A fetched record in local units with the nested lists flattened.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PokemonData {
    pub name: String,
    /// Meters.
    pub height: f64,
    /// Kilograms.
    pub weight: f64,
    pub base_experience: Option<i64>,
    pub abilities: Vec<String>,
    pub stats: BTreeMap<String, i64>,
    pub types: Vec<String>,
    pub moves: Vec<String>,
}

impl From<RawPokemon> for PokemonData {
    fn from(raw: RawPokemon) -> Self {
        Self {
            name: raw.name,
            height: raw.height / 10.0,
            weight: raw.weight / 10.0,
            base_experience: raw.base_experience,
            abilities: raw.abilities.into_iter().map(|a| a.ability.name).collect(),
            stats: raw
                .stats
                .into_iter()
                .map(|s| (s.stat.name, s.base_stat))
                .collect(),
            types: raw.types.into_iter().map(|t| t.kind.name).collect(),
            moves: raw.moves.into_iter().map(|m| m.entry.name).collect(),
        }
    }
}
