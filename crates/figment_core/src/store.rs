//! Object store for scenarios and layers
//!
//! The [`Store`] trait is the persistence seam. Scenarios own their layers,
//! so deleting a scenario deletes its layers too; the removed layer ids are
//! returned so callers can drop them from the selection.
//!
//! [`MemoryStore`] keeps everything in memory and, when given a path, writes
//! a JSON snapshot on every [`Store::save`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result, StoreError};
use crate::layer::{IdGenerator, Layer, LayerId, ScenarioId};
use crate::scenario::Scenario;

/// An entity addressable in the store
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    Scenario(ScenarioId),
    Layer(LayerId),
}

/// Persistence collaborator used by the core
pub trait Store {
    /// Insert a scenario, returning its new id
    fn insert(&mut self, scenario: Scenario) -> ScenarioId;

    /// Delete an entity, returning the ids of every layer removed with it
    fn delete(&mut self, entity: EntityId) -> Result<Vec<LayerId>>;

    /// Persistence barrier: make all changes so far durable
    fn save(&mut self) -> Result<()>;

    fn lookup(&self, id: ScenarioId) -> Option<&Scenario>;

    fn lookup_mut(&mut self, id: ScenarioId) -> Option<&mut Scenario>;

    /// Scenario ids in creation order
    fn scenario_ids(&self) -> Vec<ScenarioId>;

    /// Allocate an id no layer in this store has used
    fn next_layer_id(&mut self) -> LayerId;

    /// Find a layer in whichever scenario owns it
    fn find_layer_mut(&mut self, id: LayerId) -> Option<&mut Layer>;

    fn find_layer(&self, id: LayerId) -> Option<&Layer>;
}

/// On-disk form of a [`MemoryStore`]
#[derive(Deserialize)]
struct Snapshot {
    scenarios: IndexMap<ScenarioId, Scenario>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    scenarios: &'a IndexMap<ScenarioId, Scenario>,
}

/// In-memory store with optional JSON snapshots
#[derive(Debug, Default)]
pub struct MemoryStore {
    scenarios: IndexMap<ScenarioId, Scenario>,
    scenario_ids: IdGenerator,
    layer_ids: IdGenerator,
    snapshot_path: Option<PathBuf>,
    generation: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a snapshot file, loading it if it exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = Self {
            snapshot_path: Some(path.clone()),
            ..Self::default()
        };

        if !path.exists() {
            tracing::info!(path = %path.display(), "starting with an empty store");
            return Ok(store);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        for (id, scenario) in &snapshot.scenarios {
            store.scenario_ids.reserve_through(id.0);
            for layer in scenario.layers() {
                store.layer_ids.reserve_through(layer.id().0);
            }
        }
        store.scenarios = snapshot.scenarios;

        tracing::info!(
            path = %path.display(),
            scenarios = store.scenarios.len(),
            "loaded store snapshot"
        );
        Ok(store)
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Number of successful saves so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn owner_of(&self, id: LayerId) -> Option<ScenarioId> {
        self.scenarios
            .iter()
            .find(|(_, scenario)| scenario.contains(id))
            .map(|(scenario_id, _)| *scenario_id)
    }

    fn write_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = SnapshotRef {
            scenarios: &self.scenarios,
        };
        let content = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Store for MemoryStore {
    fn insert(&mut self, scenario: Scenario) -> ScenarioId {
        let id = ScenarioId(self.scenario_ids.next_id());
        for layer in scenario.layers() {
            self.layer_ids.reserve_through(layer.id().0);
        }
        tracing::debug!(%id, name = %scenario.name, "inserted scenario");
        self.scenarios.insert(id, scenario);
        id
    }

    fn delete(&mut self, entity: EntityId) -> Result<Vec<LayerId>> {
        match entity {
            EntityId::Scenario(id) => {
                let mut scenario = self
                    .scenarios
                    .shift_remove(&id)
                    .ok_or(StoreError::ScenarioNotFound(id))?;
                let removed = scenario.take_layer_ids();
                tracing::debug!(%id, layers = removed.len(), "deleted scenario");
                Ok(removed)
            }
            EntityId::Layer(id) => {
                let owner = self.owner_of(id).ok_or(ModelError::LayerNotFound(id))?;
                if let Some(scenario) = self.scenarios.get_mut(&owner) {
                    scenario.remove_layer(id)?;
                }
                tracing::debug!(%id, scenario = %owner, "deleted layer");
                Ok(vec![id])
            }
        }
    }

    fn save(&mut self) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            self.write_snapshot(path)?;
        }
        self.generation += 1;
        tracing::debug!(generation = self.generation, "store saved");
        Ok(())
    }

    fn lookup(&self, id: ScenarioId) -> Option<&Scenario> {
        self.scenarios.get(&id)
    }

    fn lookup_mut(&mut self, id: ScenarioId) -> Option<&mut Scenario> {
        self.scenarios.get_mut(&id)
    }

    fn scenario_ids(&self) -> Vec<ScenarioId> {
        self.scenarios.keys().copied().collect()
    }

    fn next_layer_id(&mut self) -> LayerId {
        LayerId(self.layer_ids.next_id())
    }

    fn find_layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.scenarios
            .values_mut()
            .find_map(|scenario| scenario.layer_mut(id))
    }

    fn find_layer(&self, id: LayerId) -> Option<&Layer> {
        self.scenarios
            .values()
            .find_map(|scenario| scenario.layer(id))
    }
}
