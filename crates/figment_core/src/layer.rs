//! Layers and their identifiers

use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::offset::Offset;

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Unique identifier for a layer, stable for the layer's whole life
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl LayerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier for a scenario
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub u64);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generator for unique ids
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Make sure ids already in use are never handed out again
    pub fn reserve_through(&mut self, used: u64) {
        self.next = self.next.max(used + 1);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layer
// ─────────────────────────────────────────────────────────────────────────────

/// One comparable image inside a scenario
///
/// The id and bytes are fixed at creation. After that only `hidden`,
/// `offset` and the scenario-managed priority change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LayerRecord")]
pub struct Layer {
    id: LayerId,
    #[serde(with = "base64_bytes")]
    data: Vec<u8>,
    name: String,
    /// Hidden layers keep their place in the stack but are not painted
    pub hidden: bool,
    priority: i32,
    pub offset: Offset,
    #[serde(skip)]
    content_hash: u64,
}

impl Layer {
    pub fn new(id: LayerId, data: Vec<u8>, name: impl Into<String>) -> Self {
        let content_hash = hash_bytes(&data);
        Self {
            id,
            data,
            name: name.into(),
            hidden: false,
            priority: 0,
            offset: Offset::ZERO,
            content_hash,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Raw image bytes as dropped
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display order key; lower sorts first
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Hash of the raw bytes, for caches keyed on content
    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }
}

fn hash_bytes(data: &[u8]) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data);
    hasher.finish()
}

/// Persisted shape of a layer
#[derive(Deserialize)]
struct LayerRecord {
    id: LayerId,
    #[serde(with = "base64_bytes")]
    data: Vec<u8>,
    name: String,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    offset: Offset,
}

impl From<LayerRecord> for Layer {
    fn from(record: LayerRecord) -> Self {
        let mut layer = Layer::new(record.id, record.data, record.name).with_priority(record.priority);
        layer.hidden = record.hidden;
        layer.offset = record.offset;
        layer
    }
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}
