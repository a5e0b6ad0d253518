//! Figment Core Model
//!
//! This crate holds the data model behind an image comparison session:
//!
//! - **Scenarios**: named, timestamped stacks of layers ordered by priority
//! - **Selection**: the session-wide set of selected layers
//! - **Move Commands**: keyboard nudges applied to every selected layer
//! - **Store**: persistence seam with cascade delete and JSON snapshots
//!
//! # Example
//!
//! ```rust
//! use std::time::SystemTime;
//! use figment_core::{Layer, MemoryStore, Scenario, Store};
//!
//! let mut store = MemoryStore::new();
//! let mut scenario = Scenario::new("Scenario 1", SystemTime::now());
//!
//! let before = store.next_layer_id();
//! let after = store.next_layer_id();
//! scenario.insert(Layer::new(before, b"<svg/>".to_vec(), "before"), 0).unwrap();
//! scenario.insert(Layer::new(after, b"<svg/>".to_vec(), "after"), 1).unwrap();
//!
//! // Put "after" underneath
//! scenario.reorder(1, 0).unwrap();
//! assert_eq!(scenario.priorities(), vec![0, 1]);
//! assert_eq!(scenario.ordered_layers().next().unwrap().id(), after);
//!
//! let id = store.insert(scenario);
//! assert_eq!(store.lookup(id).unwrap().len(), 2);
//! ```

pub mod command;
pub mod error;
pub mod layer;
pub mod offset;
pub mod scenario;
pub mod selection;
pub mod store;

pub use command::{move_selection, Key, MoveCommand, MoveSteps};
pub use error::{ModelError, Result, StoreError};
pub use layer::{IdGenerator, Layer, LayerId, ScenarioId};
pub use offset::Offset;
pub use scenario::{OrderedLayers, Scenario};
pub use selection::Selection;
pub use store::{EntityId, MemoryStore, Store};
