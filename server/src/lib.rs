//! Pokémon scouting service.
//!
//! # Overview
//! A small CRUD API over a local SQLite table. New records are fetched from
//! the upstream Pokémon API through `pokescout_core`, normalised, and stored
//! under a lowercase, typo-corrected name.
//!
//! # Layers
//! - `routes`: axum router and status-code mapping.
//! - `service`: normalisation, idempotent add, update, batch sync.
//! - `repository`: `PokemonRepository` trait and its SQLite implementation.
//! - `source`: `PokemonSource` trait, implemented by `pokescout_core::PokeApi`.

pub mod config;
pub mod logging;
pub mod model;
pub mod repository;
pub mod routes;
pub mod service;
pub mod source;

pub use config::{Config, ConfigError};
pub use model::Pokemon;
pub use repository::{PokemonRepository, SqliteRepository, StoreError};
pub use routes::{app, AppState};
pub use service::{
    normalize_name, AddOutcome, PokemonService, ServiceError, SyncReport, UpdateOutcome,
};
pub use source::PokemonSource;
