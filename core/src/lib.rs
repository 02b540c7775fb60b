//! Client core for the third-party Pokémon data API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). [`PokeApi`] is the one place
//! that executes the round-trip, with a bounded timeout, and collapses every
//! failure into an absence signal for the server.
//!
//! # Design
//! - `PokeApiClient` is stateless: it holds only `base_url`.
//! - Parsing also normalises: upstream tenths become meters/kilograms and the
//!   nested wrapper lists are flattened into `PokemonData`.
//! - Raw upstream shapes live in `types` next to the normalised shape so the
//!   conversion is a plain `From` impl.

pub mod client;
pub mod error;
pub mod fetch;
pub mod http;
pub mod types;

pub use client::PokeApiClient;
pub use error::ApiError;
pub use fetch::{PokeApi, DEFAULT_TIMEOUT};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{PokemonData, RawPokemon};
