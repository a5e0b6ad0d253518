//! Async layer ingestion
//!
//! Dropped payloads are loaded and decoded concurrently, one task each, and
//! committed to a scenario in a single append once every task has succeeded.
//! The batch stacks above the existing layers in input order, never in
//! completion order. If any payload fails, or the store cannot save, nothing
//! is committed and the first failure is returned. Dropping an in-flight
//! ingestion aborts its tasks and likewise commits nothing.

use std::future::Future;
use std::sync::Arc;

use figment_core::{Layer, LayerId, ScenarioId, Store, StoreError};
use figment_image::{Drawable, ImageData, ImageError, ImageSource, ParseOptions};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

/// One dropped item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropItem {
    pub source: ImageSource,
    /// Name offered by the drag source, preferred over any name derived
    /// from the payload itself
    pub suggested_name: Option<String>,
}

impl DropItem {
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: source.into(),
            suggested_name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suggested_name = Some(name.into());
        self
    }

    fn label(&self) -> String {
        self.suggested_name
            .clone()
            .or_else(|| self.source.suggested_name())
            .unwrap_or_else(|| "untitled".to_string())
    }
}

impl From<ImageSource> for DropItem {
    fn from(source: ImageSource) -> Self {
        Self::new(source)
    }
}

/// Errors from a payload loader
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Loader task failed: {0}")]
    Task(#[from] JoinError),
}

/// Errors from an ingestion batch
#[derive(Error, Debug)]
pub enum IngestError {
    /// A payload could not be read
    #[error("Failed to load dropped item {index} ({name}): {source}")]
    Load {
        index: usize,
        name: String,
        #[source]
        source: PayloadError,
    },

    /// A payload was read but is not an image
    #[error("Dropped item {index} ({name}) is not a supported image: {source}")]
    Decode {
        index: usize,
        name: String,
        #[source]
        source: ImageError,
    },

    /// A payload task panicked or was cancelled
    #[error("Ingestion task failed: {0}")]
    Task(#[from] JoinError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Source of payload bytes
///
/// Implementations may take any amount of time; ingestion never depends on
/// the order in which loads finish.
pub trait PayloadLoader: Send + Sync + 'static {
    fn load(&self, item: DropItem) -> impl Future<Output = Result<ImageData, PayloadError>> + Send;
}

/// Loads payloads from files, base64 data or in-memory bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceLoader;

impl PayloadLoader for SourceLoader {
    fn load(&self, item: DropItem) -> impl Future<Output = Result<ImageData, PayloadError>> + Send {
        async move {
            // File reads block
            let data = tokio::task::spawn_blocking(move || ImageData::load(item.source)).await??;
            Ok(data)
        }
    }
}

/// A payload that loaded and decoded successfully
#[derive(Debug, Clone)]
pub struct DecodedPayload {
    pub index: usize,
    pub name: String,
    pub bytes: Vec<u8>,
    pub drawable: Drawable,
}

/// Layers committed by an ingestion, in input order
#[derive(Debug, Clone)]
pub struct Committed {
    pub layer_ids: Vec<LayerId>,
    pub drawables: Vec<Drawable>,
}

/// Fan-out/fan-in ingestion pipeline
#[derive(Debug)]
pub struct Ingestion<L> {
    loader: Arc<L>,
    options: ParseOptions,
}

impl<L: PayloadLoader> Ingestion<L> {
    pub fn new(loader: L, options: ParseOptions) -> Self {
        Self {
            loader: Arc::new(loader),
            options,
        }
    }

    /// Load and decode every item concurrently
    ///
    /// Results come back in input order. On the first failure the remaining
    /// tasks are aborted.
    pub async fn load_all(&self, items: Vec<DropItem>) -> Result<Vec<DecodedPayload>, IngestError> {
        let count = items.len();
        let mut tasks = JoinSet::new();

        for (index, item) in items.into_iter().enumerate() {
            let loader = Arc::clone(&self.loader);
            let options = self.options;
            tasks.spawn(async move { load_one(loader.as_ref(), index, item, options).await });
        }

        let mut slots: Vec<Option<DecodedPayload>> = (0..count).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            // Returning early drops the set, which aborts whatever is left
            let payload = joined??;
            tracing::debug!(index = payload.index, name = %payload.name, "payload ready");
            let index = payload.index;
            slots[index] = Some(payload);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Load `items` and append them to a scenario as one batch
    ///
    /// The store is touched only after every payload succeeded: one append,
    /// then one `save`.
    pub async fn ingest<S: Store + ?Sized>(
        &self,
        store: &mut S,
        scenario: ScenarioId,
        items: Vec<DropItem>,
    ) -> Result<Committed, IngestError> {
        if store.lookup(scenario).is_none() {
            return Err(StoreError::ScenarioNotFound(scenario).into());
        }

        let count = items.len();
        tracing::info!(%scenario, count, "ingesting dropped items");
        let payloads = self.load_all(items).await?;
        commit(store, scenario, payloads)
    }
}

async fn load_one<L: PayloadLoader>(
    loader: &L,
    index: usize,
    item: DropItem,
    options: ParseOptions,
) -> Result<DecodedPayload, IngestError> {
    let label = item.label();
    let suggested_name = item.suggested_name.clone();

    let data = loader.load(item).await.map_err(|source| IngestError::Load {
        index,
        name: label.clone(),
        source,
    })?;

    let ImageData {
        bytes,
        suggested_name: derived_name,
    } = data;

    let (bytes, decoded) = tokio::task::spawn_blocking(move || {
        let decoded = Drawable::decode(&bytes, options);
        (bytes, decoded)
    })
    .await?;

    let drawable = decoded.map_err(|source| {
        tracing::warn!(index, name = %label, %source, "dropped item is not an image");
        IngestError::Decode {
            index,
            name: label,
            source,
        }
    })?;

    let name = suggested_name
        .or(derived_name)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    Ok(DecodedPayload {
        index,
        name,
        bytes,
        drawable,
    })
}

/// Append decoded payloads to a scenario above every existing layer
///
/// Priorities continue from the scenario's current maximum, so the batch
/// keeps its input order and lands on top even after a reorder. A failed
/// save takes the batch back out.
fn commit<S: Store + ?Sized>(
    store: &mut S,
    scenario: ScenarioId,
    payloads: Vec<DecodedPayload>,
) -> Result<Committed, IngestError> {
    let base = store
        .lookup(scenario)
        .ok_or(StoreError::ScenarioNotFound(scenario))?
        .layers()
        .iter()
        .map(Layer::priority)
        .max()
        .map_or(0, |top| top.saturating_add(1));

    let mut layers = Vec::with_capacity(payloads.len());
    let mut drawables = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let id = store.next_layer_id();
        let priority = base.saturating_add(payload.index as i32);
        layers.push(Layer::new(id, payload.bytes, payload.name).with_priority(priority));
        drawables.push(payload.drawable);
    }
    let layer_ids: Vec<LayerId> = layers.iter().map(Layer::id).collect();

    let target = store
        .lookup_mut(scenario)
        .ok_or(StoreError::ScenarioNotFound(scenario))?;
    target.append_layers(layers).map_err(StoreError::from)?;

    if let Err(err) = store.save() {
        tracing::warn!(%scenario, error = %err, "save failed, rolling back dropped layers");
        if let Some(target) = store.lookup_mut(scenario) {
            for id in &layer_ids {
                let _ = target.remove_layer(*id);
            }
        }
        return Err(err.into());
    }

    tracing::info!(%scenario, layers = layer_ids.len(), "committed dropped layers");
    Ok(Committed {
        layer_ids,
        drawables,
    })
}
