//! Dashboard command routing
//!
//! Handles: list_scenarios, get_scenario_view, select_scenario,
//! toggle_recommendation, reset_recommendations

use crate::dashboard::ScenarioView;
use crate::models::ScenarioId;
use crate::server::events::DASHBOARD_CHANGED;
use serde_json::Value;

use super::{get_arg, route_sync, ServerAppState};

/// Route dashboard commands
pub fn route_dashboard_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    match cmd {
        "list_scenarios" => route_sync!(state.lock_dashboard().map(|d| d.scenario_summaries())),

        "get_scenario_view" => route_sync!(state.lock_dashboard().map(|d| d.view())),

        "select_scenario" => {
            let scenario: String = get_arg(&args, "scenario")?;
            let id: ScenarioId = scenario.parse()?;

            let view = {
                let mut dashboard = state.lock_dashboard()?;
                if dashboard.select_scenario(id) {
                    log::debug!("Active scenario is now {}", id);
                }
                dashboard.view()
            };
            publish(state, &view)
        }

        "toggle_recommendation" => {
            let id: String = get_arg(&args, "recommendationId")?;
            let view = {
                let mut dashboard = state.lock_dashboard()?;
                dashboard.toggle_recommendation(&id);
                dashboard.view()
            };
            publish(state, &view)
        }

        "reset_recommendations" => {
            let view = {
                let mut dashboard = state.lock_dashboard()?;
                dashboard.reset_recommendations();
                dashboard.view()
            };
            publish(state, &view)
        }

        _ => Err(format!("Unknown dashboard command: {}", cmd)),
    }
}

/// Tell every open page about the new view and hand it back to the caller
fn publish(state: &ServerAppState, view: &ScenarioView) -> Result<Value, String> {
    let value = serde_json::to_value(view).map_err(|e| e.to_string())?;
    state.broadcaster.broadcast(DASHBOARD_CHANGED, &value);
    Ok(value)
}

/// Check if a command is a dashboard command
pub fn is_dashboard_command(cmd: &str) -> bool {
    matches!(
        cmd,
        "list_scenarios"
            | "get_scenario_view"
            | "select_scenario"
            | "toggle_recommendation"
            | "reset_recommendations"
    )
}
