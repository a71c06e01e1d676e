//! Static scenario catalog
//!
//! Built once at startup from the series generator plus each scenario's
//! per-metric overrides, validated, and never mutated afterwards. Applying a
//! recommendation changes the dashboard's toggle state, not the catalog.

mod kubernetes;
mod serverless;

use crate::models::{Metric, MetricPoint, Observation, Recommendation, Scenario, ScenarioId, Severity};
use crate::series::{generate_series, round1, SeriesSpec};
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

/// Points per metric in the reference data
pub const POINTS_PER_METRIC: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Scenario {scenario}: duplicate metric key '{key}'")]
    DuplicateMetric { scenario: ScenarioId, key: String },

    #[error("Scenario {scenario}: duplicate observation id '{id}'")]
    DuplicateObservation { scenario: ScenarioId, id: String },

    #[error("Scenario {scenario}: duplicate recommendation id '{id}'")]
    DuplicateRecommendation { scenario: ScenarioId, id: String },

    #[error("Scenario {scenario}: observation '{observation}' references unknown metric '{metric_key}'")]
    DanglingMetricKey {
        scenario: ScenarioId,
        observation: String,
        metric_key: String,
    },

    #[error("Scenario {scenario}: recommendation '{recommendation}' references unknown observation '{observation_id}'")]
    DanglingObservation {
        scenario: ScenarioId,
        recommendation: String,
        observation_id: String,
    },

    #[error("Scenario {scenario}: metric '{key}' has a negative value at {time}")]
    NegativeValue {
        scenario: ScenarioId,
        key: String,
        time: String,
    },
}

/// Lookup from scenario id to its full record
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    serverless: Scenario,
    kubernetes: Scenario,
}

impl ScenarioCatalog {
    /// Build and validate both scenarios using the supplied random source
    pub fn build<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, CatalogError> {
        let serverless = serverless::build(rng);
        let kubernetes = kubernetes::build(rng);
        let catalog = Self::from_parts(serverless, kubernetes)?;

        log::info!(
            "Scenario catalog built: {}",
            catalog
                .scenarios()
                .map(|s| format!("{} ({} metrics)", s.id, s.metrics.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(catalog)
    }

    /// Validate a prepared pair of scenarios
    pub fn from_parts(serverless: Scenario, kubernetes: Scenario) -> Result<Self, CatalogError> {
        validate_scenario(&serverless)?;
        validate_scenario(&kubernetes)?;
        Ok(Self {
            serverless,
            kubernetes,
        })
    }

    /// Get a scenario by id
    pub fn get(&self, id: ScenarioId) -> &Scenario {
        match id {
            ScenarioId::Serverless => &self.serverless,
            ScenarioId::Kubernetes => &self.kubernetes,
        }
    }

    /// Scenarios in selector order
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        ScenarioId::ALL.into_iter().map(move |id| self.get(id))
    }
}

/// Resolve every cross-reference of a scenario, failing on the first dangling one
pub fn validate_scenario(scenario: &Scenario) -> Result<(), CatalogError> {
    let mut metric_keys = HashSet::new();
    for metric in &scenario.metrics {
        if !metric_keys.insert(metric.key.as_str()) {
            return Err(CatalogError::DuplicateMetric {
                scenario: scenario.id,
                key: metric.key.clone(),
            });
        }
        if let Some(point) = metric
            .data
            .iter()
            .find(|p| p.value < 0.0 || p.optimized_value < 0.0)
        {
            return Err(CatalogError::NegativeValue {
                scenario: scenario.id,
                key: metric.key.clone(),
                time: point.time.clone(),
            });
        }
    }

    let mut observation_ids = HashSet::new();
    for obs in &scenario.observations {
        if !observation_ids.insert(obs.id.as_str()) {
            return Err(CatalogError::DuplicateObservation {
                scenario: scenario.id,
                id: obs.id.clone(),
            });
        }
        if !metric_keys.contains(obs.metric_key.as_str()) {
            return Err(CatalogError::DanglingMetricKey {
                scenario: scenario.id,
                observation: obs.id.clone(),
                metric_key: obs.metric_key.clone(),
            });
        }
    }

    let mut recommendation_ids = HashSet::new();
    for rec in &scenario.recommendations {
        if !recommendation_ids.insert(rec.id.as_str()) {
            return Err(CatalogError::DuplicateRecommendation {
                scenario: scenario.id,
                id: rec.id.clone(),
            });
        }
        if !observation_ids.contains(rec.observation_id.as_str()) {
            return Err(CatalogError::DanglingObservation {
                scenario: scenario.id,
                recommendation: rec.id.clone(),
                observation_id: rec.observation_id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Builders shared by the scenario modules
// =============================================================================

/// Generate a metric and apply a per-point override
fn metric_with<R, F>(
    rng: &mut R,
    key: &str,
    label: &str,
    unit: &str,
    spec: SeriesSpec,
    mut adjust: F,
) -> Metric
where
    R: Rng + ?Sized,
    F: FnMut(usize, MetricPoint, &mut R) -> (f64, f64),
{
    let raw = generate_series(&spec, rng);
    let data = raw
        .into_iter()
        .enumerate()
        .map(|(i, point)| {
            let time = point.time.clone();
            let (value, optimized) = adjust(i, point, &mut *rng);
            MetricPoint {
                time,
                value: round1(value.max(0.0)),
                optimized_value: round1(optimized.max(0.0)),
            }
        })
        .collect();

    Metric {
        key: key.to_string(),
        label: label.to_string(),
        unit: unit.to_string(),
        data,
    }
}

fn observation(
    id: &str,
    title: &str,
    description: &str,
    severity: Severity,
    metric_key: &str,
) -> Observation {
    Observation {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        severity,
        metric_key: metric_key.to_string(),
    }
}

fn recommendation(
    id: &str,
    observation_id: &str,
    title: &str,
    description: &str,
    impact: &str,
) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        observation_id: observation_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        impact: impact.to_string(),
        implemented: false,
    }
}

fn tech_stack(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
