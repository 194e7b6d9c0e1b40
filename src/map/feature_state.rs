use std::collections::HashMap;
use std::fmt;

/// Identifier generated for each feature from its position in the source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub usize);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Transient per-feature styling flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeatureState {
    pub hover: bool,
}

/// Feature state for one source
#[derive(Default)]
pub struct FeatureStateStore {
    states: HashMap<FeatureId, FeatureState>,
}

impl FeatureStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: FeatureId, state: FeatureState) {
        if state == FeatureState::default() {
            self.states.remove(&id);
        } else {
            self.states.insert(id, state);
        }
    }

    pub fn get(&self, id: FeatureId) -> FeatureState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Features currently flagged as hovered
    pub fn hovered(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.states
            .iter()
            .filter(|(_, s)| s.hover)
            .map(|(&id, _)| id)
    }
}
