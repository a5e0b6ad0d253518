//! The session-wide set of selected layers
//!
//! Selection is held by a single logical owner (the session) and replaced
//! wholesale by whichever view wrote last; there is no locking. Entries may
//! outlive the layers they name, and every consumer treats such entries as
//! absent.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::layer::LayerId;
use crate::scenario::Scenario;

/// Set of selected layer ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: FxHashSet<LayerId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole selection (last writer wins)
    pub fn replace(&mut self, ids: impl IntoIterator<Item = LayerId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn insert(&mut self, id: LayerId) -> bool {
        self.ids.insert(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in no particular order
    pub fn iter(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.ids.iter().copied()
    }

    /// Display positions of the selected layers that live in `scenario`
    pub fn indices_in(&self, scenario: &Scenario) -> SmallVec<[usize; 4]> {
        scenario
            .ordered_layers()
            .enumerate()
            .filter(|(_, layer)| self.contains(layer.id()))
            .map(|(index, _)| index)
            .collect()
    }

    /// Forget ids that no longer exist
    pub fn prune(&mut self, removed: &[LayerId]) {
        for id in removed {
            self.ids.remove(id);
        }
    }
}

impl FromIterator<LayerId> for Selection {
    fn from_iter<I: IntoIterator<Item = LayerId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::layer::Layer;

    #[test]
    fn test_replace_is_last_writer_wins() {
        let mut selection = Selection::new();
        selection.replace([LayerId(1), LayerId(2)]);
        selection.replace([LayerId(3)]);
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(LayerId(3)));
        assert!(!selection.contains(LayerId(1)));
    }

    #[test]
    fn test_indices_in_skips_stale_ids() {
        let mut scenario = Scenario::new("s", SystemTime::UNIX_EPOCH);
        scenario.insert(Layer::new(LayerId(1), vec![], "a"), 1).expect("insert");
        scenario.insert(Layer::new(LayerId(2), vec![], "b"), 0).expect("insert");

        let selection: Selection = [LayerId(1), LayerId(404)].into_iter().collect();
        assert_eq!(selection.indices_in(&scenario).as_slice(), &[1]);
    }

    #[test]
    fn test_prune() {
        let mut selection: Selection = [LayerId(1), LayerId(2)].into_iter().collect();
        selection.prune(&[LayerId(2), LayerId(3)]);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![LayerId(1)]);
    }
}
