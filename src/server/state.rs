//! Server application state shared across handlers

use super::events::EventBroadcaster;
use super::page::PageRenderer;
use crate::assistant::AssistantSession;
use crate::dashboard::DashboardState;
use crate::shutdown::ShutdownState;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared state for the server: the one dashboard view and the one assistant
/// session this process owns.
#[derive(Clone)]
pub struct ServerAppState {
    /// Active scenario and applied recommendations
    pub dashboard: Arc<Mutex<DashboardState>>,

    /// Transcript and conversation with the hosted model
    pub assistant: Arc<Mutex<AssistantSession>>,

    /// Shutdown state
    pub shutdown_state: ShutdownState,

    /// Event broadcaster for WebSocket clients
    pub broadcaster: Arc<EventBroadcaster>,

    /// Compiled dashboard page template
    pub page: Arc<PageRenderer>,
}

impl ServerAppState {
    pub fn new(
        dashboard: DashboardState,
        assistant: AssistantSession,
        shutdown_state: ShutdownState,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            assistant: Arc::new(Mutex::new(assistant)),
            shutdown_state,
            broadcaster: Arc::new(EventBroadcaster::new()),
            page: Arc::new(PageRenderer::new()?),
        })
    }

    pub fn lock_dashboard(&self) -> Result<MutexGuard<'_, DashboardState>, String> {
        self.dashboard.lock().map_err(|e| e.to_string())
    }

    pub fn lock_assistant(&self) -> Result<MutexGuard<'_, AssistantSession>, String> {
        self.assistant.lock().map_err(|e| e.to_string())
    }
}
