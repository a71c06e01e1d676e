// Scenario models - canonical definitions for case studies, metrics and findings

use serde::{Deserialize, Serialize};

// ============================================================================
// Scenario Identifier
// ============================================================================

/// The two fixed case studies shown by the dashboard.
/// Serializes as lowercase strings to match the page's selector values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioId {
    Serverless,
    Kubernetes,
}

impl ScenarioId {
    /// Every scenario, in selector order
    pub const ALL: [ScenarioId; 2] = [ScenarioId::Serverless, ScenarioId::Kubernetes];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioId::Serverless => "serverless",
            ScenarioId::Kubernetes => "kubernetes",
        }
    }

    /// Short label used by the scenario selector
    pub fn nav_label(&self) -> &'static str {
        match self {
            ScenarioId::Serverless => "Student Management",
            ScenarioId::Kubernetes => "Voting Application",
        }
    }
}

impl Default for ScenarioId {
    fn default() -> Self {
        ScenarioId::Serverless
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "serverless" => Ok(ScenarioId::Serverless),
            "kubernetes" | "k8s" => Ok(ScenarioId::Kubernetes),
            _ => Err(format!(
                "Invalid scenario: '{}'. Expected 'serverless' or 'kubernetes'",
                s
            )),
        }
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// One x-axis position of a metric series.
///
/// `time` is a positional label (index plus unit suffix), not a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub time: String,
    pub value: f64,
    pub optimized_value: f64,
}

/// A labeled series with its measurement unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Key observations refer to (e.g. "latency", "dnsErrors")
    pub key: String,
    pub label: String,
    pub unit: String,
    pub data: Vec<MetricPoint>,
}

// ============================================================================
// Findings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A textual finding tied to one metric of its scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub metric_key: String,
}

/// A mitigation tied to one observation.
///
/// `implemented` is always `false` in the catalog; the dashboard view
/// overrides it from the live toggle set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub observation_id: String,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub implemented: bool,
}

// ============================================================================
// Scenario
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    /// Metrics in display order
    pub metrics: Vec<Metric>,
    pub observations: Vec<Observation>,
    pub recommendations: Vec<Recommendation>,
}

impl Scenario {
    /// Look up a metric by key
    pub fn metric(&self, key: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    /// Look up an observation by id
    pub fn observation(&self, id: &str) -> Option<&Observation> {
        self.observations.iter().find(|o| o.id == id)
    }

    /// Look up a recommendation by id
    pub fn recommendation(&self, id: &str) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.id == id)
    }

    /// Metric keys in display order
    pub fn metric_keys(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.key.as_str()).collect()
    }
}
