//! Command routing modules
//!
//! - dashboard_routes: scenario selection and recommendation toggles
//! - assistant_routes: chat transcript and message sending

pub mod assistant_routes;
pub mod dashboard_routes;

use serde_json::Value;

use super::ServerAppState;

// =============================================================================
// Helper functions for use by route modules
// =============================================================================

/// Extract a required argument from JSON args
pub fn get_arg<T: serde::de::DeserializeOwned>(args: &Value, name: &str) -> Result<T, String> {
    serde_json::from_value(
        args.get(name)
            .ok_or_else(|| format!("Missing argument: {}", name))?
            .clone(),
    )
    .map_err(|e| format!("Invalid argument {}: {}", name, e))
}

/// Extract an optional argument from JSON args
pub fn get_opt_arg<T: serde::de::DeserializeOwned>(
    args: &Value,
    name: &str,
) -> Result<Option<T>, String> {
    match args.get(name) {
        Some(v) if !v.is_null() => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| format!("Invalid argument {}: {}", name, e)),
        _ => Ok(None),
    }
}

// =============================================================================
// Command Routing Macros
// =============================================================================

/// Routes a sync command
#[macro_export]
macro_rules! route_sync {
    ($handler:expr) => {{
        let result = $handler?;
        serde_json::to_value(result).map_err(|e| e.to_string())
    }};
}

pub use route_sync;

// =============================================================================
// Main Command Dispatcher
// =============================================================================

/// Route a command to its implementation by dispatching to the appropriate sub-router
pub async fn route_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    if dashboard_routes::is_dashboard_command(cmd) {
        return dashboard_routes::route_dashboard_command(cmd, args, state);
    }

    if assistant_routes::is_assistant_command(cmd) {
        return assistant_routes::route_assistant_command(cmd, args, state).await;
    }

    Err(format!("Unknown command: {}", cmd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_arg() {
        let args = json!({ "scenario": "kubernetes" });
        let value: String = get_arg(&args, "scenario").unwrap();
        assert_eq!(value, "kubernetes");

        let missing: Result<String, String> = get_arg(&args, "recommendationId");
        assert_eq!(missing.unwrap_err(), "Missing argument: recommendationId");
    }

    #[test]
    fn test_get_opt_arg() {
        let args = json!({ "text": null, "n": 3 });
        let text: Option<String> = get_opt_arg(&args, "text").unwrap();
        assert!(text.is_none());
        let n: Option<u32> = get_opt_arg(&args, "n").unwrap();
        assert_eq!(n, Some(3));
        assert!(get_opt_arg::<String>(&args, "n").is_err());
    }
}
