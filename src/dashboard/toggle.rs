// Recommendation toggle state for the active scenario

use std::collections::BTreeSet;

/// The set of recommendations currently "applied" in the view.
///
/// Ids are not checked against the scenario; an unknown id is simply added
/// or removed like any other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationToggles {
    active: BTreeSet<String>,
}

impl RecommendationToggles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether it is applied afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.active.remove(id) {
            false
        } else {
            self.active.insert(id.to_string());
            true
        }
    }

    pub fn is_applied(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    /// Any applied recommendation turns on the optimized overlay for every chart
    pub fn is_optimized_view(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn reset(&mut self) {
        self.active.clear();
    }

    /// Applied ids in sorted order
    pub fn applied(&self) -> Vec<String> {
        self.active.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut toggles = RecommendationToggles::new();
        toggles.toggle("rec-2");
        let before = toggles.clone();

        assert!(toggles.toggle("rec-1"));
        assert!(!toggles.toggle("rec-1"));
        assert_eq!(toggles, before);
    }

    #[test]
    fn test_optimized_view_tracks_membership() {
        let mut toggles = RecommendationToggles::new();
        assert!(!toggles.is_optimized_view());

        toggles.toggle("rec-k1");
        assert!(toggles.is_optimized_view());
        assert!(toggles.is_applied("rec-k1"));

        toggles.toggle("rec-k1");
        assert!(!toggles.is_optimized_view());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut toggles = RecommendationToggles::new();
        toggles.toggle("rec-1");
        toggles.toggle("rec-3");
        assert_eq!(toggles.len(), 2);

        toggles.reset();
        assert!(toggles.is_empty());
        assert!(!toggles.is_optimized_view());
    }

    #[test]
    fn test_unknown_ids_are_accepted() {
        let mut toggles = RecommendationToggles::new();
        assert!(toggles.toggle("does-not-exist"));
        assert_eq!(toggles.applied(), vec!["does-not-exist".to_string()]);
    }
}
