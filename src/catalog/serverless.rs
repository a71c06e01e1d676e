// Student Management App - AWS serverless case study

use super::{metric_with, observation, recommendation, tech_stack, POINTS_PER_METRIC};
use crate::models::{Scenario, ScenarioId, Severity};
use crate::series::{uniform, SeriesSpec};
use rand::Rng;

/// First-invocation latency and its SnapStart counterpart
pub const COLD_START_LATENCY_MS: f64 = 980.0;
pub const SNAPSTART_LATENCY_MS: f64 = 150.0;

pub(super) fn build<R: Rng + ?Sized>(rng: &mut R) -> Scenario {
    // Cold start spike at index 0; warm calls fluctuate around 200ms
    let latency = metric_with(
        rng,
        "latency",
        "Cold Start Latency",
        "ms",
        SeriesSpec::new(POINTS_PER_METRIC, 100.0, 50.0)
            .with_spike(0)
            .with_time_unit("s"),
        |i, _, rng| {
            if i == 0 {
                (COLD_START_LATENCY_MS, SNAPSTART_LATENCY_MS)
            } else {
                (200.0 + uniform(rng, 50.0), 50.0 + uniform(rng, 10.0))
            }
        },
    );

    // Saturated at the ceiling; optimized plateau after scaling memory
    let memory = metric_with(
        rng,
        "memory",
        "Memory Utilization",
        "%",
        SeriesSpec::new(POINTS_PER_METRIC, 95.0, 5.0).with_time_unit("h"),
        |_, p, _| (p.value.min(100.0), 40.0),
    );

    // 5XX bursts during the bulk insert window
    let errors = metric_with(
        rng,
        "errors",
        "Error Rate (5XX)",
        " count",
        SeriesSpec::new(POINTS_PER_METRIC, 0.0, 0.0).with_time_unit("h"),
        |i, _, _| if i > 10 && i < 15 { (3.0, 0.0) } else { (0.0, 0.0) },
    );

    Scenario {
        id: ScenarioId::Serverless,
        title: "Student Management App".to_string(),
        description:
            "Serverless architecture on AWS handling student records and bulk operations."
                .to_string(),
        tech_stack: tech_stack(&["AWS Lambda", "DynamoDB", "API Gateway", "n8n"]),
        metrics: vec![latency, memory, errors],
        observations: vec![
            observation(
                "obs-1",
                "High Cold Start Latency",
                "980ms latency observed on first invocation due to initialization overhead.",
                Severity::High,
                "latency",
            ),
            observation(
                "obs-2",
                "Memory Saturation",
                "Lambda functions consistently hitting 100% memory utilization during load.",
                Severity::High,
                "memory",
            ),
            observation(
                "obs-3",
                "Integration Timeouts",
                "API Gateway 5XX errors during bulk data insertion of 1000 records.",
                Severity::Medium,
                "errors",
            ),
        ],
        recommendations: vec![
            recommendation(
                "rec-1",
                "obs-1",
                "Enable SnapStart",
                "Implement Lambda SnapStart to cache initialized execution environments, drastically reducing cold start latency.",
                "Reduces latency by ~90%",
            ),
            recommendation(
                "rec-2",
                "obs-2",
                "Scale Lambda Memory",
                "Increase memory allocation. In Lambda, this proportionally increases CPU power, resolving bottlenecks.",
                "Eliminates OOM errors",
            ),
            recommendation(
                "rec-3",
                "obs-3",
                "Async Processing",
                "Decouple bulk inserts using SQS/EventBridge to prevent API Gateway timeouts.",
                "100% Reliability on Bulk Ops",
            ),
        ],
    }
}
