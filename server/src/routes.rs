//! HTTP surface, mounted under `/api/v1`.
//!
//! The service is synchronous (SQLite plus a blocking upstream client), so
//! each handler moves its call onto the blocking pool and maps the typed
//! outcome to a status code and JSON body.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use crate::model::Pokemon;
use crate::service::{AddOutcome, PokemonService, ServiceError, SyncReport, UpdateOutcome};

#[derive(Clone)]
pub struct AppState {
    pub service: PokemonService,
    /// Names synced by `POST /refresh`.
    pub pokemon_list: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(service: PokemonService, pokemon_list: Vec<String>) -> Self {
        Self {
            service,
            pokemon_list: Arc::new(pokemon_list),
        }
    }
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct AddedBody {
    message: String,
    pokemon: Pokemon,
}

#[derive(Serialize)]
struct RefreshBody {
    message: &'static str,
    #[serde(flatten)]
    report: SyncReport,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/pokemon", get(list_pokemon))
        .route(
            "/pokemon/{name}",
            get(get_pokemon)
                .post(add_pokemon)
                .put(update_pokemon)
                .patch(update_pokemon)
                .delete(delete_pokemon),
        )
        .route("/refresh", post(refresh))
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

fn message_response(status: StatusCode, message: String) -> Response {
    (status, Json(MessageBody { message })).into_response()
}

/// Run a service call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Worker(e.to_string()))?
}

async fn list_pokemon(State(state): State<AppState>) -> Result<Json<Vec<Pokemon>>, ServiceError> {
    let service = state.service;
    let all = blocking(move || service.get_all()).await?;
    Ok(Json(all))
}

async fn get_pokemon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServiceError> {
    let service = state.service;
    let found = blocking(move || service.get(&name)).await?;
    Ok(match found {
        Some(pokemon) => (StatusCode::OK, Json(pokemon)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Pokemon not found".to_string()),
    })
}

async fn add_pokemon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServiceError> {
    let service = state.service;
    let outcome = blocking(move || service.add(&name)).await?;
    let message = outcome.message();
    Ok(match outcome {
        AddOutcome::Created(pokemon) => {
            (StatusCode::CREATED, Json(AddedBody { message, pokemon })).into_response()
        }
        AddOutcome::AlreadyExists(pokemon) => {
            (StatusCode::ACCEPTED, Json(AddedBody { message, pokemon })).into_response()
        }
        AddOutcome::FetchFailed { .. } => error_response(StatusCode::NOT_FOUND, message),
    })
}

async fn delete_pokemon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServiceError> {
    let service = state.service;
    let target = name.clone();
    let deleted = blocking(move || service.delete(&target)).await?;
    Ok(if deleted {
        message_response(StatusCode::OK, format!("Successfully deleted {name}"))
    } else {
        error_response(StatusCode::NOT_FOUND, format!("Pokemon {name} not found"))
    })
}

/// Both failure kinds answer 404.
async fn update_pokemon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ServiceError> {
    let service = state.service;
    let outcome = blocking(move || service.update(&name)).await?;
    let message = outcome.message();
    Ok(match outcome {
        UpdateOutcome::Updated(_) => message_response(StatusCode::OK, message),
        UpdateOutcome::NotFound { .. } | UpdateOutcome::FetchFailed { .. } => {
            error_response(StatusCode::NOT_FOUND, message)
        }
    })
}

async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshBody>, ServiceError> {
    let service = state.service;
    let names = state.pokemon_list;
    let report = blocking(move || Ok(service.sync(names.as_slice()))).await?;
    Ok(Json(RefreshBody {
        message: "Data refresh process completed",
        report,
    }))
}
