use crate::state::{AppState, SessionSnapshot};
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use protocol::RouteInput;
use risk_client::dashboard::DashboardView;
use risk_client::session::{InvalidTransition, SessionError, SessionEvent};
use risk_client::{RiskError, UPSTREAM_USER_MESSAGE};

pub(crate) fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze_route))
        .route("/session", get(get_session))
        .route("/session/dashboard", get(get_dashboard))
        .route("/session/dashboard/text", get(get_dashboard_text))
        .route("/session/dismiss", post(dismiss_error))
        .route("/session/reset", post(reset_session))
        .with_state(app_state)
        .layer(middleware::from_fn(log_http_request))
}

async fn health() -> &'static str {
    "ok"
}

async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        "http request"
    );
    response
}

fn error_status(err: &RiskError) -> StatusCode {
    match err {
        RiskError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RiskError::Configuration => StatusCode::SERVICE_UNAVAILABLE,
        RiskError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

fn conflict(err: InvalidTransition) -> Response {
    let payload = SessionError {
        code: "invalid_transition".to_string(),
        message: err.to_string(),
        retryable: false,
    };
    (StatusCode::CONFLICT, Json(payload)).into_response()
}

async fn analyze_route(
    State(app): State<AppState>,
    body: Result<Json<RouteInput>, JsonRejection>,
) -> Response {
    let route = match body {
        Ok(Json(route)) => route,
        Err(rejection) => return malformed_route(rejection),
    };
    {
        let mut state = app.state.write().await;
        if let Err(err) = state.apply(SessionEvent::Submit(route.clone())) {
            tracing::warn!(error = %err, "analysis refused");
            return conflict(err);
        }
    }

    // Detached: the outcome lands even if the caller hangs up.
    let task = tokio::spawn(run_analysis(app.clone(), route));
    match task.await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "analysis task aborted");
            let payload = SessionError {
                code: "internal_error".to_string(),
                message: UPSTREAM_USER_MESSAGE.to_string(),
                retryable: true,
            };
            settle(&app, SessionEvent::Rejected(payload.clone())).await;
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

async fn run_analysis(app: AppState, route: RouteInput) -> Response {
    match app.client.analyze(&route).await {
        Ok(result) => {
            settle(&app, SessionEvent::Resolved(result.clone())).await;
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => {
            let payload = SessionError::from(&err);
            settle(&app, SessionEvent::Rejected(payload.clone())).await;
            (error_status(&err), Json(payload)).into_response()
        }
    }
}

async fn settle(app: &AppState, event: SessionEvent) {
    let mut state = app.state.write().await;
    if let Err(err) = state.apply(event) {
        tracing::warn!(error = %err, "session moved while analysis was running");
    }
}

/// Bodies that are not a well-formed route never reach the session.
fn malformed_route(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection.body_text(), "route body rejected");
    let payload = SessionError {
        code: "invalid_input".to_string(),
        message: format!("invalid route input: {}", rejection.body_text()),
        retryable: false,
    };
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

async fn get_session(State(app): State<AppState>) -> Json<SessionSnapshot> {
    let state = app.state.read().await;
    Json(state.snapshot())
}

fn dashboard_view(app_state: &crate::state::ConsoleState) -> Option<DashboardView> {
    let session = app_state.session();
    let route = session.route()?;
    let result = session.result()?;
    Some(DashboardView::new(route, result))
}

async fn get_dashboard(State(app): State<AppState>) -> Result<Json<DashboardView>, StatusCode> {
    let state = app.state.read().await;
    dashboard_view(&state).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_dashboard_text(State(app): State<AppState>) -> Result<String, StatusCode> {
    let state = app.state.read().await;
    dashboard_view(&state)
        .map(|view| view.render_text())
        .ok_or(StatusCode::NOT_FOUND)
}

async fn dismiss_error(State(app): State<AppState>) -> Response {
    apply_and_snapshot(&app, SessionEvent::DismissError).await
}

async fn reset_session(State(app): State<AppState>) -> Response {
    apply_and_snapshot(&app, SessionEvent::Reset).await
}

async fn apply_and_snapshot(app: &AppState, event: SessionEvent) -> Response {
    let mut state = app.state.write().await;
    if let Err(err) = state.apply(event) {
        return conflict(err);
    }
    Json(state.snapshot()).into_response()
}
