//! Stateless HTTP request builder and response parser for the Pokémon API.
//!
//! # Design
//! `PokeApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Fetching a record is split into `build_get_pokemon`, which produces
//! an `HttpRequest`, and `parse_get_pokemon`, which consumes an `HttpResponse`
//! and yields the normalised `PokemonData`.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{PokemonData, RawPokemon};

/// Synchronous, stateless client for the upstream Pokémon API.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The upstream API only knows lowercase names made of ASCII letters,
    /// digits and hyphens. Anything else (`?`, `#`, `/`, ...) would change
    /// the URL rather than name a pokemon, so it is rejected here.
    pub fn build_get_pokemon(&self, name: &str) -> Result<HttpRequest, ApiError> {
        let name = name.to_lowercase();
        if !is_valid_name(&name) {
            return Err(ApiError::InvalidName(name));
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/pokemon/{}", self.base_url, name),
        })
    }

    pub fn parse_get_pokemon(&self, response: HttpResponse) -> Result<PokemonData, ApiError> {
        check_status(&response)?;
        let raw: RawPokemon = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Ok(raw.into())
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
