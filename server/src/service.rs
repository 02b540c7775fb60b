//! Scouting logic: name normalisation, idempotent add, refresh-from-upstream
//! and the batch sync over a configured list.
//!
//! # Design
//! Every public operation normalises its input before touching the repository
//! or the source. Outcomes are tagged enums so the HTTP layer branches on a
//! discriminant; each outcome also renders the user-facing message.
//! Store failures are the only errors; an unfetchable name is an outcome.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::model::Pokemon;
use crate::repository::{PokemonRepository, StoreError};
use crate::source::PokemonSource;

/// Known misspellings and the name the upstream API actually uses.
pub const NAME_CORRECTIONS: &[(&str, &str)] = &[("terodactyl", "aerodactyl")];

/// Lowercase, trim, then apply `NAME_CORRECTIONS`.
pub fn normalize_name(name: &str) -> String {
    let clean = name.trim().to_lowercase();
    NAME_CORRECTIONS
        .iter()
        .find(|(typo, _)| *typo == clean)
        .map(|(_, fixed)| (*fixed).to_string())
        .unwrap_or(clean)
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The blocking task running the operation died.
    #[error("worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Created(Pokemon),
    /// Nothing was fetched or written.
    AlreadyExists(Pokemon),
    FetchFailed {
        requested: String,
        normalized: String,
    },
}

impl AddOutcome {
    pub fn message(&self) -> String {
        match self {
            AddOutcome::Created(p) => format!("Successfully added {} to database", p.name),
            AddOutcome::AlreadyExists(p) => {
                format!("Pokemon {} already exists in database", p.name)
            }
            AddOutcome::FetchFailed {
                requested,
                normalized,
            } => format!("Failed to fetch data for {requested} (mapped to {normalized})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Pokemon),
    NotFound { name: String },
    FetchFailed { name: String },
}

impl UpdateOutcome {
    pub fn message(&self) -> String {
        match self {
            UpdateOutcome::Updated(p) => format!("Successfully updated {}", p.name),
            UpdateOutcome::NotFound { name } => format!("Pokemon {name} not found locally"),
            UpdateOutcome::FetchFailed { name } => format!("Failed to fetch update for {name}"),
        }
    }
}

/// Per-name result of a batch sync, in list order. Names are as configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub existing: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Clone)]
pub struct PokemonService {
    repository: Arc<dyn PokemonRepository>,
    source: Arc<dyn PokemonSource>,
}

impl PokemonService {
    pub fn new(repository: Arc<dyn PokemonRepository>, source: Arc<dyn PokemonSource>) -> Self {
        Self { repository, source }
    }

    pub fn get_all(&self) -> Result<Vec<Pokemon>, ServiceError> {
        Ok(self.repository.get_all()?)
    }

    #[instrument(skip(self))]
    pub fn get(&self, name: &str) -> Result<Option<Pokemon>, ServiceError> {
        Ok(self.repository.get_by_name(&normalize_name(name))?)
    }

    /// Fetch `name` and store it, unless it is already stored.
    #[instrument(skip(self))]
    pub fn add(&self, name: &str) -> Result<AddOutcome, ServiceError> {
        let normalized = normalize_name(name);

        if let Some(existing) = self.repository.get_by_name(&normalized)? {
            return Ok(AddOutcome::AlreadyExists(existing));
        }

        let Some(data) = self.source.fetch(&normalized) else {
            return Ok(AddOutcome::FetchFailed {
                requested: name.to_string(),
                normalized,
            });
        };

        // Another add of the same name may have stored it since the check above.
        match self.repository.save(Pokemon::from_fetched(&normalized, data)) {
            Ok(saved) => Ok(AddOutcome::Created(saved)),
            Err(StoreError::Duplicate(taken)) => {
                match self.repository.get_by_name(&normalized)? {
                    Some(existing) => Ok(AddOutcome::AlreadyExists(existing)),
                    None => Err(StoreError::Duplicate(taken).into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub fn delete(&self, name: &str) -> Result<bool, ServiceError> {
        match self.repository.get_by_name(&normalize_name(name))? {
            Some(pokemon) => {
                self.repository.delete(&pokemon)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-fetch a stored record and overwrite its attributes. Names that are
    /// not stored are never fetched.
    #[instrument(skip(self))]
    pub fn update(&self, name: &str) -> Result<UpdateOutcome, ServiceError> {
        let normalized = normalize_name(name);

        let Some(mut pokemon) = self.repository.get_by_name(&normalized)? else {
            return Ok(UpdateOutcome::NotFound { name: normalized });
        };

        let Some(data) = self.source.fetch(&normalized) else {
            return Ok(UpdateOutcome::FetchFailed { name: normalized });
        };

        pokemon.apply(data);
        let saved = self.repository.save(pokemon)?;
        Ok(UpdateOutcome::Updated(saved))
    }

    /// Add every name in order. A failure is recorded and the loop moves on.
    #[instrument(skip_all, fields(count = names.len()))]
    pub fn sync<S: AsRef<str>>(&self, names: &[S]) -> SyncReport {
        info!("starting batch sync");
        let mut report = SyncReport::default();

        for name in names {
            let name = name.as_ref();
            match self.add(name) {
                Ok(outcome @ AddOutcome::Created(_)) => {
                    info!("{}", outcome.message());
                    report.added.push(name.to_string());
                }
                Ok(outcome @ AddOutcome::AlreadyExists(_)) => {
                    info!("Skipping {name}: {}", outcome.message());
                    report.existing.push(name.to_string());
                }
                Ok(outcome @ AddOutcome::FetchFailed { .. }) => {
                    error!("{}", outcome.message());
                    report.failed.push(name.to_string());
                }
                Err(e) => {
                    error!(name, error = %e, "could not store pokemon during sync");
                    report.failed.push(name.to_string());
                }
            }
        }

        info!(
            added = report.added.len(),
            existing = report.existing.len(),
            failed = report.failed.len(),
            "batch sync finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    use pokescout_core::PokemonData;

    use super::*;
    use crate::repository::SqliteRepository;

    /// In-memory source that records every name it is asked for.
    #[derive(Default)]
    struct FakeSource {
        data: Mutex<HashMap<String, PokemonData>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with(names: &[&str]) -> Arc<Self> {
            let source = Arc::new(Self::default());
            for name in names {
                source.put(sample(name, 6.0));
            }
            source
        }

        fn put(&self, data: PokemonData) {
            self.data.lock().unwrap().insert(data.name.clone(), data);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PokemonSource for FakeSource {
        fn fetch(&self, name: &str) -> Option<PokemonData> {
            self.calls.lock().unwrap().push(name.to_string());
            self.data.lock().unwrap().get(name).cloned()
        }
    }

    fn sample(name: &str, weight: f64) -> PokemonData {
        PokemonData {
            name: name.to_string(),
            height: 0.4,
            weight,
            base_experience: Some(112),
            abilities: vec!["static".to_string()],
            stats: BTreeMap::from([("speed".to_string(), 90)]),
            types: vec!["electric".to_string()],
            moves: vec!["thunder-shock".to_string()],
        }
    }

    fn service(source: Arc<FakeSource>) -> PokemonService {
        let repo = Arc::new(SqliteRepository::in_memory().unwrap());
        PokemonService::new(repo, source)
    }

    #[test]
    fn normalize_lowercases_trims_and_corrects() {
        assert_eq!(normalize_name("  Pikachu "), "pikachu");
        assert_eq!(normalize_name("TERODACTYL"), "aerodactyl");
        assert_eq!(normalize_name("terodactyl "), "aerodactyl");
        assert_eq!(normalize_name("aerodactyl"), "aerodactyl");
    }

    #[test]
    fn add_then_get_returns_normalized_record() {
        let svc = service(FakeSource::with(&["pikachu"]));

        let outcome = svc.add("Pikachu").unwrap();
        assert!(matches!(outcome, AddOutcome::Created(_)));
        assert_eq!(outcome.message(), "Successfully added pikachu to database");

        let stored = svc.get("pikachu").unwrap().unwrap();
        assert_eq!(stored.name, "pikachu");
        assert!(stored.id.is_some());
    }

    #[test]
    fn add_is_idempotent_and_fetches_once() {
        let source = FakeSource::with(&["pikachu"]);
        let svc = service(source.clone());

        assert!(matches!(svc.add("pikachu").unwrap(), AddOutcome::Created(_)));
        let second = svc.add("pikachu").unwrap();
        assert!(matches!(second, AddOutcome::AlreadyExists(_)));
        assert_eq!(second.message(), "Pokemon pikachu already exists in database");

        assert_eq!(source.calls(), vec!["pikachu"]);
        assert_eq!(svc.get_all().unwrap().len(), 1);
    }

    #[test]
    fn typo_variants_resolve_to_one_record() {
        let source = FakeSource::with(&["aerodactyl"]);
        let svc = service(source.clone());

        assert!(matches!(svc.add("TERODACTYL").unwrap(), AddOutcome::Created(_)));
        assert!(matches!(svc.add("terodactyl ").unwrap(), AddOutcome::AlreadyExists(_)));
        assert!(matches!(svc.add("Terodactyl").unwrap(), AddOutcome::AlreadyExists(_)));

        let all = svc.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "aerodactyl");
        assert_eq!(source.calls(), vec!["aerodactyl"]);
    }

    #[test]
    fn add_with_unfetchable_name_persists_nothing() {
        let svc = service(FakeSource::with(&[]));

        let outcome = svc.add("MissingNo").unwrap();
        assert_eq!(
            outcome,
            AddOutcome::FetchFailed {
                requested: "MissingNo".to_string(),
                normalized: "missingno".to_string(),
            }
        );
        assert_eq!(
            outcome.message(),
            "Failed to fetch data for MissingNo (mapped to missingno)"
        );
        assert!(svc.get_all().unwrap().is_empty());
    }

    /// Source that lets a competing add store the record while it fetches.
    struct RacingSource {
        repo: Arc<SqliteRepository>,
    }

    impl PokemonSource for RacingSource {
        fn fetch(&self, name: &str) -> Option<PokemonData> {
            self.repo
                .save(Pokemon::from_fetched(name, sample(name, 1.0)))
                .unwrap();
            Some(sample(name, 6.0))
        }
    }

    #[test]
    fn add_that_loses_insert_race_reports_existing() {
        let repo = Arc::new(SqliteRepository::in_memory().unwrap());
        let svc = PokemonService::new(repo.clone(), Arc::new(RacingSource { repo: repo.clone() }));

        let outcome = svc.add("Charizard").unwrap();
        match outcome {
            AddOutcome::AlreadyExists(ref existing) => assert_eq!(existing.weight, 1.0),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        assert_eq!(outcome.message(), "Pokemon charizard already exists in database");
        assert_eq!(repo.get_all().unwrap().len(), 1);
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let svc = service(FakeSource::with(&["pikachu"]));
        svc.add("pikachu").unwrap();

        assert!(svc.delete("PIKACHU").unwrap());
        assert!(svc.get("pikachu").unwrap().is_none());
        assert!(!svc.delete("pikachu").unwrap());
    }

    #[test]
    fn update_of_unknown_name_does_not_fetch() {
        let source = FakeSource::with(&["pikachu"]);
        let svc = service(source.clone());

        let outcome = svc.update("pikachu").unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::NotFound {
                name: "pikachu".to_string()
            }
        );
        assert!(source.calls().is_empty());
    }

    #[test]
    fn update_overwrites_fetched_fields() {
        let source = FakeSource::with(&["pikachu"]);
        let svc = service(source.clone());
        svc.add("pikachu").unwrap();

        source.put(sample("pikachu", 999.9));
        let outcome = svc.update("pikachu").unwrap();
        assert!(matches!(outcome, UpdateOutcome::Updated(_)));
        assert_eq!(outcome.message(), "Successfully updated pikachu");

        assert_eq!(svc.get("pikachu").unwrap().unwrap().weight, 999.9);
    }

    #[test]
    fn update_with_failed_fetch_keeps_record() {
        let source = FakeSource::with(&["pikachu"]);
        let svc = service(source.clone());
        svc.add("pikachu").unwrap();
        source.data.lock().unwrap().clear();

        let outcome = svc.update("pikachu").unwrap();
        assert_eq!(outcome.message(), "Failed to fetch update for pikachu");
        assert_eq!(svc.get("pikachu").unwrap().unwrap().weight, 6.0);
    }

    #[test]
    fn sync_isolates_failures() {
        let svc = service(FakeSource::with(&["pikachu", "charizard"]));

        let report = svc.sync(&["pikachu", "missingno", "charizard"]);

        assert_eq!(report.added, vec!["pikachu", "charizard"]);
        assert_eq!(report.failed, vec!["missingno"]);
        assert!(report.existing.is_empty());
        assert_eq!(svc.get_all().unwrap().len(), 2);
    }

    #[test]
    fn sync_twice_reports_existing() {
        let source = FakeSource::with(&["pikachu", "aerodactyl"]);
        let svc = service(source.clone());
        let names = vec!["pikachu".to_string(), "terodactyl".to_string()];

        svc.sync(&names);
        let report = svc.sync(&names);

        assert_eq!(report.existing, names);
        assert!(report.added.is_empty());
        assert_eq!(source.calls().len(), 2);
    }
}
