//! Dashboard view state
//!
//! Owns the only mutable part of the dashboard: which scenario is active and
//! which of its recommendations are applied. Everything shown on the page is
//! derived from that plus the immutable catalog.

pub mod toggle;

pub use toggle::RecommendationToggles;

use crate::catalog::ScenarioCatalog;
use crate::chart::ChartSpec;
use crate::models::{Observation, Recommendation, ScenarioId};
use serde::Serialize;
use std::sync::Arc;

/// Snapshot of everything the page renders for the active scenario
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioView {
    pub id: ScenarioId,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub observations: Vec<Observation>,
    /// Catalog recommendations with `implemented` taken from the toggle set
    pub recommendations: Vec<Recommendation>,
    pub optimized: bool,
    pub charts: Vec<ChartSpec>,
}

/// Entry for the scenario selector
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub label: String,
    pub title: String,
    pub active: bool,
}

pub struct DashboardState {
    catalog: Arc<ScenarioCatalog>,
    active: ScenarioId,
    toggles: RecommendationToggles,
}

impl DashboardState {
    pub fn new(catalog: Arc<ScenarioCatalog>, initial: ScenarioId) -> Self {
        Self {
            catalog,
            active: initial,
            toggles: RecommendationToggles::new(),
        }
    }

    pub fn active(&self) -> ScenarioId {
        self.active
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn toggles(&self) -> &RecommendationToggles {
        &self.toggles
    }

    /// Switch the active scenario.
    ///
    /// A different scenario always starts with a fresh, empty toggle set;
    /// re-selecting the active one leaves it untouched. Returns whether the
    /// scenario changed.
    pub fn select_scenario(&mut self, id: ScenarioId) -> bool {
        if id == self.active {
            return false;
        }
        log::debug!(
            "Switching scenario {} -> {} ({} toggles dropped)",
            self.active,
            id,
            self.toggles.len()
        );
        self.active = id;
        self.toggles = RecommendationToggles::new();
        true
    }

    /// Flip a recommendation in the active scenario; returns the new membership
    pub fn toggle_recommendation(&mut self, id: &str) -> bool {
        let applied = self.toggles.toggle(id);
        log::debug!(
            "Recommendation '{}' {} in {}",
            id,
            if applied { "applied" } else { "reverted" },
            self.active
        );
        applied
    }

    pub fn reset_recommendations(&mut self) {
        self.toggles.reset();
    }

    pub fn is_optimized_view(&self) -> bool {
        self.toggles.is_optimized_view()
    }

    /// Lowercase id shown in the breadcrumb
    pub fn breadcrumb(&self) -> &'static str {
        self.active.as_str()
    }

    pub fn scenario_summaries(&self) -> Vec<ScenarioSummary> {
        self.catalog
            .scenarios()
            .map(|s| ScenarioSummary {
                id: s.id,
                label: s.id.nav_label().to_string(),
                title: s.title.clone(),
                active: s.id == self.active,
            })
            .collect()
    }

    pub fn view(&self) -> ScenarioView {
        let scenario = self.catalog.get(self.active);
        let optimized = self.toggles.is_optimized_view();

        ScenarioView {
            id: scenario.id,
            title: scenario.title.clone(),
            description: scenario.description.clone(),
            tech_stack: scenario.tech_stack.clone(),
            observations: scenario.observations.clone(),
            recommendations: scenario
                .recommendations
                .iter()
                .map(|r| Recommendation {
                    implemented: self.toggles.is_applied(&r.id),
                    ..r.clone()
                })
                .collect(),
            optimized,
            charts: scenario
                .metrics
                .iter()
                .map(|m| ChartSpec::from_metric(m, optimized))
                .collect(),
        }
    }
}
