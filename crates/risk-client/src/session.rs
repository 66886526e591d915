use protocol::{AnalysisResult, RouteInput};
use serde::Serialize;
use thiserror::Error;

use crate::error::RiskError;

/// Error as the presentation layer sees it: one message, no partial data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl From<&RiskError> for SessionError {
    fn from(err: &RiskError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.user_message(),
            retryable: err.retryable(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Loading {
        route: RouteInput,
    },
    Succeeded {
        route: RouteInput,
        result: AnalysisResult,
    },
    Failed {
        route: RouteInput,
        error: SessionError,
    },
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Submit(RouteInput),
    Resolved(AnalysisResult),
    Rejected(SessionError),
    DismissError,
    Reset,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Submit(_) => "submit",
            SessionEvent::Resolved(_) => "resolved",
            SessionEvent::Rejected(_) => "rejected",
            SessionEvent::DismissError => "dismiss_error",
            SessionEvent::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot apply {event} while session is {state}")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub event: &'static str,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Loading { .. } => "loading",
            SessionState::Succeeded { .. } => "succeeded",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading { .. })
    }

    pub fn route(&self) -> Option<&RouteInput> {
        match self {
            SessionState::Idle => None,
            SessionState::Loading { route }
            | SessionState::Succeeded { route, .. }
            | SessionState::Failed { route, .. } => Some(route),
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            SessionState::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SessionError> {
        match self {
            SessionState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Pure transition function. The current state is never modified; callers
/// swap in the returned state.
///
/// A submission is refused while another one is in flight, and there is no
/// way out of `Loading` other than the analysis outcome.
pub fn transition(
    state: &SessionState,
    event: SessionEvent,
) -> Result<SessionState, InvalidTransition> {
    let invalid = InvalidTransition {
        state: state.name(),
        event: event.name(),
    };
    match (state, event) {
        (SessionState::Loading { .. }, SessionEvent::Submit(_)) => Err(invalid),
        (_, SessionEvent::Submit(route)) => Ok(SessionState::Loading { route }),
        (SessionState::Loading { route }, SessionEvent::Resolved(result)) => {
            Ok(SessionState::Succeeded {
                route: route.clone(),
                result,
            })
        }
        (SessionState::Loading { route }, SessionEvent::Rejected(error)) => {
            Ok(SessionState::Failed {
                route: route.clone(),
                error,
            })
        }
        (SessionState::Failed { .. }, SessionEvent::DismissError) => Ok(SessionState::Idle),
        (SessionState::Loading { .. }, SessionEvent::Reset) => Err(invalid),
        (_, SessionEvent::Reset) => Ok(SessionState::Idle),
        _ => Err(invalid),
    }
}
