// Data models shared by the catalog, the dashboard view and the page templates

pub mod chat;
pub mod scenario;

pub use chat::{ChatMessage, MessageRole};
pub use scenario::{
    Metric, MetricPoint, Observation, Recommendation, Scenario, ScenarioId, Severity,
};
