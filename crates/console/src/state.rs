use humantime::format_rfc3339_seconds;
use risk_client::session::{transition, InvalidTransition, SessionEvent, SessionState};
use risk_client::{ModelTransport, RouteRiskClient};
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

pub(crate) type SharedClient = Arc<RouteRiskClient<Arc<dyn ModelTransport>>>;

/// The single analysis session behind the form.
pub(crate) struct ConsoleState {
    session: SessionState,
    updated_at: SystemTime,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionSnapshot {
    pub(crate) session: SessionState,
    pub(crate) updated_at: String,
}

impl ConsoleState {
    pub(crate) fn new() -> Self {
        Self {
            session: SessionState::Idle,
            updated_at: SystemTime::now(),
        }
    }

    pub(crate) fn session(&self) -> &SessionState {
        &self.session
    }

    pub(crate) fn apply(&mut self, event: SessionEvent) -> Result<&SessionState, InvalidTransition> {
        let from = self.session.name();
        let next = transition(&self.session, event)?;
        tracing::info!(from = from, to = next.name(), "session transition");
        self.session = next;
        self.updated_at = SystemTime::now();
        Ok(&self.session)
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.session.clone(),
            updated_at: format_rfc3339_seconds(self.updated_at).to_string(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) state: Arc<RwLock<ConsoleState>>,
    pub(crate) client: SharedClient,
}

impl AppState {
    pub(crate) fn new(client: SharedClient) -> Self {
        Self {
            state: Arc::new(RwLock::new(ConsoleState::new())),
            client,
        }
    }
}
