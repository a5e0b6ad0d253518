//! Session facade
//!
//! A [`Session`] ties the store, the session-wide selection, the compositor
//! and the ingestion pipeline together. It is the single owner of the
//! selection; views read it and replace it wholesale.

use std::time::SystemTime;

use figment_core::{
    move_selection, EntityId, Key, LayerId, MemoryStore, MoveCommand, Scenario, ScenarioId,
    Selection, Store, StoreError,
};
use figment_paint::Size;

use crate::compositor::{Compositor, Frame, ViewState};
use crate::config::FigmentConfig;
use crate::ingest::{DropItem, IngestError, Ingestion, PayloadLoader, SourceLoader};

pub struct Session<S = MemoryStore, L = SourceLoader> {
    store: S,
    selection: Selection,
    config: FigmentConfig,
    compositor: Compositor,
    ingestion: Ingestion<L>,
}

impl<S: Store> Session<S, SourceLoader> {
    pub fn new(store: S, config: FigmentConfig) -> Self {
        Self::with_loader(store, config, SourceLoader)
    }
}

impl<S: Store, L: PayloadLoader> Session<S, L> {
    pub fn with_loader(store: S, config: FigmentConfig, loader: L) -> Self {
        Self {
            compositor: Compositor::new(&config),
            ingestion: Ingestion::new(loader, config.parse_options()),
            store,
            selection: Selection::new(),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &FigmentConfig {
        &self.config
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn scenario(&self, id: ScenarioId) -> Option<&Scenario> {
        self.store.lookup(id)
    }

    // === Scenarios ===

    /// Create an empty scenario named after its position
    pub fn add_scenario(&mut self) -> Result<ScenarioId, StoreError> {
        let name = format!("Scenario {}", self.store.scenario_ids().len() + 1);
        let id = self.store.insert(Scenario::new(name, SystemTime::now()));
        self.store.save()?;
        Ok(id)
    }

    /// Delete a scenario and its layers, dropping them from the selection
    pub fn delete_scenario(&mut self, id: ScenarioId) -> Result<(), StoreError> {
        let removed = self.store.delete(EntityId::Scenario(id))?;
        self.selection.prune(&removed);
        self.store.save()
    }

    pub fn delete_layer(&mut self, id: LayerId) -> Result<(), StoreError> {
        let removed = self.store.delete(EntityId::Layer(id))?;
        self.selection.prune(&removed);
        self.store.save()
    }

    // === Ingestion ===

    /// Load dropped items into a scenario
    ///
    /// On success the decoded drawables are handed to the compositor's
    /// cache so the next frame does not parse them again.
    pub async fn drop_items(
        &mut self,
        scenario: ScenarioId,
        items: Vec<DropItem>,
    ) -> Result<Vec<LayerId>, IngestError> {
        let committed = self.ingestion.ingest(&mut self.store, scenario, items).await?;

        if let Some(target) = self.store.lookup(scenario) {
            for (id, drawable) in committed.layer_ids.iter().zip(committed.drawables) {
                if let Some(layer) = target.layer(*id) {
                    self.compositor.cache_mut().prime(layer, drawable);
                }
            }
        }
        Ok(committed.layer_ids)
    }

    // === Selection ===

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the selection (last writer wins)
    pub fn select(&mut self, ids: impl IntoIterator<Item = LayerId>) {
        self.selection.replace(ids);
    }

    /// Select layers by their position in a scenario's display order
    ///
    /// Positions past the end are ignored.
    pub fn select_positions(&mut self, scenario: ScenarioId, positions: &[usize]) {
        let Some(target) = self.store.lookup(scenario) else {
            tracing::debug!(%scenario, "select on a missing scenario");
            self.selection.clear();
            return;
        };
        let ids: Vec<LayerId> = target
            .ordered_layers()
            .enumerate()
            .filter(|(position, _)| positions.contains(position))
            .map(|(_, layer)| layer.id())
            .collect();
        self.selection.replace(ids);
    }

    // === Layer edits ===

    /// Flip a layer's visibility, returning the new `hidden` value
    pub fn toggle_hidden(&mut self, scenario: ScenarioId, layer: LayerId) -> Result<bool, StoreError> {
        let target = self
            .store
            .lookup_mut(scenario)
            .ok_or(StoreError::ScenarioNotFound(scenario))?;
        Ok(target.toggle_hidden(layer)?)
    }

    /// Reorder using positions in the inspector list (topmost first)
    pub fn reorder_in_list(&mut self, scenario: ScenarioId, from: usize, to: usize) -> Result<(), StoreError> {
        let target = self
            .store
            .lookup_mut(scenario)
            .ok_or(StoreError::ScenarioNotFound(scenario))?;
        target.reorder_in_list(from, to)?;
        Ok(())
    }

    // === Commands ===

    /// Run a move command against the selection, returning how many layers
    /// moved
    pub fn run_command(&mut self, command: MoveCommand) -> usize {
        if !command.is_enabled(&self.selection) {
            return 0;
        }
        move_selection(&mut self.store, &self.selection, command, self.config.move_steps())
    }

    /// Handle a key press; unbound keys do nothing
    pub fn handle_key(&mut self, key: Key, shift: bool) -> usize {
        match MoveCommand::from_key(key, shift) {
            Some(command) => self.run_command(command),
            None => 0,
        }
    }

    // === Rendering ===

    /// Render a scenario; a missing scenario renders nothing
    pub fn render(&mut self, scenario: ScenarioId, viewport: Size, view: ViewState) -> Option<Frame> {
        let target = self.store.lookup(scenario)?;
        Some(self.compositor.render(target, &self.selection, viewport, view))
    }
}
