//! Blocking transport for `PokeApiClient`.
//!
//! `PokeApi` pairs the stateless client with a `ureq` agent and is the only
//! code in the workspace that talks to the upstream API. Failures never escape
//! `get_pokemon`: they are logged and reported as `None`, which callers read as
//! "not fetchable".

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::PokeApiClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::PokemonData;

/// Upper bound on a single upstream round-trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct PokeApi {
    client: PokeApiClient,
    agent: ureq::Agent,
}

impl fmt::Debug for PokeApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PokeApi")
            .field("base_url", &self.client.base_url())
            .finish_non_exhaustive()
    }
}

impl PokeApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        // Status codes are data here; `PokeApiClient` interprets them.
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            client: PokeApiClient::new(base_url),
            agent,
        }
    }

    pub fn client(&self) -> &PokeApiClient {
        &self.client
    }

    /// Fetch and normalise `name`, or `None` on any failure.
    pub fn get_pokemon(&self, name: &str) -> Option<PokemonData> {
        match self.try_get_pokemon(name) {
            Ok(data) => Some(data),
            Err(ApiError::NotFound) => {
                warn!(name, "upstream has no such pokemon");
                None
            }
            Err(e) => {
                warn!(name, error = %e, "failed to fetch pokemon from upstream");
                None
            }
        }
    }

    pub fn try_get_pokemon(&self, name: &str) -> Result<PokemonData, ApiError> {
        let req = self.client.build_get_pokemon(name)?;
        debug!(url = %req.path, "fetching pokemon");
        let response = self.execute(req)?;
        self.client.parse_get_pokemon(response)
    }

    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let call = match req.method {
            HttpMethod::Get => self.agent.get(&req.path).call(),
        };
        let mut response = call.map_err(|e| ApiError::TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::TransportError(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
