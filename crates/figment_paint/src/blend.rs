//! Blend modes for layer composition

use serde::{Deserialize, Serialize};

/// Blend mode for layer composition
///
/// Under `Difference`, identical pixels cancel out to black.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Difference,
}
