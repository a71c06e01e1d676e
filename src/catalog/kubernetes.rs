// Voting Application - Kubernetes on EC2 case study

use super::{metric_with, observation, recommendation, tech_stack, POINTS_PER_METRIC};
use crate::models::{Scenario, ScenarioId, Severity};
use crate::series::SeriesSpec;
use rand::Rng;

/// NXDOMAIN rate after scaling CoreDNS
pub const SCALED_DNS_ERROR_PCT: f64 = 2.0;
/// Observed usage vs. provisioned memory
pub const USED_MEMORY_MB: f64 = 500.0;
pub const PROVISIONED_MEMORY_MB: f64 = 2048.0;

pub(super) fn build<R: Rng + ?Sized>(rng: &mut R) -> Scenario {
    let dns_errors = metric_with(
        rng,
        "dnsErrors",
        "NXDOMAIN Errors",
        "%",
        SeriesSpec::new(POINTS_PER_METRIC, 75.0, 10.0).with_time_unit("h"),
        |_, p, _| (p.value.min(100.0), SCALED_DNS_ERROR_PCT),
    );

    // Underutilization: flat usage against the provisioned ceiling
    let memory = metric_with(
        rng,
        "memory",
        "Memory Usage",
        "MB",
        SeriesSpec::new(POINTS_PER_METRIC, 2048.0, 100.0).with_time_unit("h"),
        |_, _, _| (USED_MEMORY_MB, PROVISIONED_MEMORY_MB),
    );

    Scenario {
        id: ScenarioId::Kubernetes,
        title: "Voting Application".to_string(),
        description:
            "Microservices deployed on Kubernetes (EKS/EC2) with Prometheus monitoring."
                .to_string(),
        tech_stack: tech_stack(&["Kubernetes", "EC2", "Prometheus", "Grafana", "CoreDNS"]),
        metrics: vec![dns_errors, memory],
        observations: vec![
            observation(
                "obs-k1",
                "High DNS Failure Rate",
                "79% of internal requests failing with NXDOMAIN due to CoreDNS congestion.",
                Severity::High,
                "dnsErrors",
            ),
            observation(
                "obs-k2",
                "Resource Waste",
                "Memory allocation is significantly higher than actual usage patterns.",
                Severity::Low,
                "memory",
            ),
        ],
        recommendations: vec![
            recommendation(
                "rec-k1",
                "obs-k1",
                "Scale CoreDNS",
                "Increase the replica count of CoreDNS pods and enable autoscale to handle internal service discovery traffic.",
                "Reduces NXDOMAIN to <1%",
            ),
            recommendation(
                "rec-k2",
                "obs-k2",
                "Right-Size Nodes",
                "Reduce requested resources for pods and switch to smaller EC2 instance types to save costs.",
                "Reduces Cost by 40%",
            ),
        ],
    }
}
