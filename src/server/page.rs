//! Server-rendered dashboard page
//!
//! The page is one tera template filled from the current dashboard view and
//! assistant transcript. Charts are rendered to inline SVG on the server.

use super::ServerAppState;
use crate::assistant::{AssistantSession, AssistantStatus};
use crate::chart::render_svg;
use crate::dashboard::{DashboardState, ScenarioSummary, ScenarioView};
use crate::models::ChatMessage;
use anyhow::{anyhow, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tera::{Context, Tera};

const PAGE_TEMPLATE: &str = "dashboard.html";
const PAGE_SOURCE: &str = include_str!("../../templates/dashboard.html");

#[derive(Debug, Serialize)]
struct RenderedChart {
    key: String,
    title: String,
    svg: String,
}

#[derive(Debug, Serialize)]
struct PageContext<'a> {
    scenarios: Vec<ScenarioSummary>,
    breadcrumb: &'a str,
    view: ScenarioView,
    charts: Vec<RenderedChart>,
    transcript: &'a [ChatMessage],
    assistant_status: AssistantStatus,
    has_credential: bool,
    version: &'a str,
}

/// Template engine holding the compiled dashboard page
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE, PAGE_SOURCE)
            .map_err(|e| anyhow!("Failed to add template '{}': {}", PAGE_TEMPLATE, e))?;
        Ok(Self { tera })
    }

    pub fn render(&self, dashboard: &DashboardState, assistant: &AssistantSession) -> Result<String> {
        let view = dashboard.view();
        let charts = view
            .charts
            .iter()
            .map(|spec| RenderedChart {
                key: spec.metric_key.clone(),
                title: spec.title.clone(),
                svg: render_svg(spec),
            })
            .collect();

        let page = PageContext {
            scenarios: dashboard.scenario_summaries(),
            breadcrumb: dashboard.breadcrumb(),
            view,
            charts,
            transcript: assistant.transcript(),
            assistant_status: assistant.status(),
            has_credential: assistant.has_credential(),
            version: env!("CARGO_PKG_VERSION"),
        };

        let ctx = Context::from_serialize(&page)
            .map_err(|e| anyhow!("Failed to build page context: {}", e))?;

        self.tera
            .render(PAGE_TEMPLATE, &ctx)
            .map_err(|e| anyhow!("Failed to render template '{}': {}", PAGE_TEMPLATE, e))
    }
}

/// `GET /`
pub async fn index_handler(State(state): State<ServerAppState>) -> Response {
    let rendered = (|| -> Result<String> {
        let dashboard = state.lock_dashboard().map_err(|e| anyhow!(e))?;
        let assistant = state.lock_assistant().map_err(|e| anyhow!(e))?;
        state.page.render(&dashboard, &assistant)
    })();

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log::error!("Failed to render dashboard page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScenarioCatalog;
    use crate::models::ScenarioId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn dashboard() -> DashboardState {
        let catalog = ScenarioCatalog::build(&mut StdRng::seed_from_u64(9)).unwrap();
        DashboardState::new(Arc::new(catalog), ScenarioId::Serverless)
    }

    #[test]
    fn test_page_lists_both_scenarios() {
        let html = PageRenderer::new()
            .unwrap()
            .render(&dashboard(), &AssistantSession::new(None))
            .unwrap();

        assert!(html.contains("Student Management"));
        assert!(html.contains("Voting Application"));
        assert!(html.contains("Apply Fix"));
        assert!(html.contains("Observations"));
        assert!(html.contains("I am your Infrastructure Insights Assistant"));
        assert_eq!(html.matches("<svg").count(), 3);
    }

    #[test]
    fn test_page_reflects_applied_recommendation() {
        let mut dashboard = dashboard();
        dashboard.select_scenario(ScenarioId::Kubernetes);
        dashboard.toggle_recommendation("rec-k1");

        let html = PageRenderer::new()
            .unwrap()
            .render(&dashboard, &AssistantSession::new(None))
            .unwrap();

        assert!(html.contains("Applied"));
        assert!(html.contains("data-series=\"optimizedValue\""));
        assert!(html.contains(">kubernetes<"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut assistant = AssistantSession::new(None);
        assistant.begin_send("<script>alert(1)</script>").unwrap();

        let html = PageRenderer::new()
            .unwrap()
            .render(&dashboard(), &assistant)
            .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
