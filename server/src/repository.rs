//! Persistence for `Pokemon` records.
//!
//! # Design
//! `PokemonRepository` is CRUD-only: get-by-name, get-all, save (insert or
//! update) and delete. Normalisation and idempotency live in the service.
//! `SqliteRepository` keeps a single `rusqlite::Connection` behind a mutex;
//! every `save` runs in its own transaction. List and map attributes are
//! stored as JSON text.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::Pokemon;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS pokemon (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT    NOT NULL UNIQUE,
    height          REAL    NOT NULL,
    weight          REAL    NOT NULL,
    base_experience INTEGER,
    abilities       TEXT    NOT NULL,
    stats           TEXT    NOT NULL,
    types           TEXT    NOT NULL,
    moves           TEXT    NOT NULL,
    created_at      TEXT    NOT NULL,
    updated_at      TEXT    NOT NULL
);
";

const SELECT_COLUMNS: &str = "SELECT id, name, height, weight, base_experience, abilities, \
     stats, types, moves, created_at, updated_at FROM pokemon";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not encode column: {0}")]
    Encode(#[from] serde_json::Error),

    /// An insert collided with a stored record of the same name.
    #[error("pokemon {0} is already stored")]
    Duplicate(String),

    /// An update targeted a row that no longer exists.
    #[error("no stored pokemon with id {0}")]
    Missing(i64),

    #[error("store lock poisoned")]
    Poisoned,
}

pub trait PokemonRepository: Send + Sync {
    /// Look a record up by name, compared lowercase.
    fn get_by_name(&self, name: &str) -> Result<Option<Pokemon>, StoreError>;

    fn get_all(&self) -> Result<Vec<Pokemon>, StoreError>;

    /// Insert when `id` is `None`, update otherwise. Returns the record as
    /// stored, with its id and timestamps filled in. An insert whose name is
    /// already stored fails with `StoreError::Duplicate`.
    fn save(&self, pokemon: Pokemon) -> Result<Pokemon, StoreError>;

    fn delete(&self, pokemon: &Pokemon) -> Result<(), StoreError>;
}

#[derive(Debug)]
pub struct SqliteRepository {
    conn: Mutex<Connection>,
}

impl SqliteRepository {
    /// Open (or create) a store. Accepts a file path, `sqlite://path`,
    /// `sqlite:path` or `:memory:`.
    pub fn open(connection_string: &str) -> Result<Self, StoreError> {
        let conn = match sqlite_path(connection_string) {
            ":memory:" => Connection::open_in_memory()?,
            path => Connection::open(path)?,
        };
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl PokemonRepository for SqliteRepository {
    fn get_by_name(&self, name: &str) -> Result<Option<Pokemon>, StoreError> {
        let conn = self.lock()?;
        let pokemon = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE name = ?1"),
                params![name.to_lowercase()],
                row_to_pokemon,
            )
            .optional()?;
        Ok(pokemon)
    }

    fn get_all(&self) -> Result<Vec<Pokemon>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_pokemon)?;
        let mut all = Vec::new();
        for row in rows {
            all.push(row?);
        }
        Ok(all)
    }

    fn save(&self, mut pokemon: Pokemon) -> Result<Pokemon, StoreError> {
        pokemon.name = pokemon.name.to_lowercase();
        pokemon.updated_at = Utc::now();
        let abilities = serde_json::to_string(&pokemon.abilities)?;
        let stats = serde_json::to_string(&pokemon.stats)?;
        let types = serde_json::to_string(&pokemon.types)?;
        let moves = serde_json::to_string(&pokemon.moves)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        match pokemon.id {
            None => {
                pokemon.created_at = pokemon.updated_at;
                tx.execute(
                    "INSERT INTO pokemon (name, height, weight, base_experience, abilities, \
                     stats, types, moves, created_at, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        pokemon.name,
                        pokemon.height,
                        pokemon.weight,
                        pokemon.base_experience,
                        abilities,
                        stats,
                        types,
                        moves,
                        pokemon.created_at,
                        pokemon.updated_at,
                    ],
                )
                .map_err(|e| insert_error(&pokemon.name, e))?;
                pokemon.id = Some(tx.last_insert_rowid());
            }
            Some(id) => {
                let changed = tx.execute(
                    "UPDATE pokemon SET name = ?1, height = ?2, weight = ?3, \
                     base_experience = ?4, abilities = ?5, stats = ?6, types = ?7, \
                     moves = ?8, updated_at = ?9 WHERE id = ?10",
                    params![
                        pokemon.name,
                        pokemon.height,
                        pokemon.weight,
                        pokemon.base_experience,
                        abilities,
                        stats,
                        types,
                        moves,
                        pokemon.updated_at,
                        id,
                    ],
                )?;
                if changed == 0 {
                    return Err(StoreError::Missing(id));
                }
            }
        }
        tx.commit()?;
        debug!(name = %pokemon.name, id = ?pokemon.id, "saved pokemon");
        Ok(pokemon)
    }

    fn delete(&self, pokemon: &Pokemon) -> Result<(), StoreError> {
        let conn = self.lock()?;
        match pokemon.id {
            Some(id) => conn.execute("DELETE FROM pokemon WHERE id = ?1", params![id])?,
            None => conn.execute(
                "DELETE FROM pokemon WHERE name = ?1",
                params![pokemon.name.to_lowercase()],
            )?,
        };
        debug!(name = %pokemon.name, "deleted pokemon");
        Ok(())
    }
}

fn insert_error(name: &str, err: rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StoreError::Duplicate(name.to_string())
        }
        err => StoreError::Sqlite(err),
    }
}

fn sqlite_path(connection_string: &str) -> &str {
    connection_string
        .strip_prefix("sqlite://")
        .or_else(|| connection_string.strip_prefix("sqlite:"))
        .unwrap_or(connection_string)
}

fn row_to_pokemon(row: &Row<'_>) -> rusqlite::Result<Pokemon> {
    Ok(Pokemon {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        height: row.get(2)?,
        weight: row.get(3)?,
        base_experience: row.get(4)?,
        abilities: json_column(row, 5)?,
        stats: json_column(row, 6)?,
        types: json_column(row, 7)?,
        moves: json_column(row, 8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
