use crate::server::pages;
use crate::shell::{CheckOutcome, Screen, Shell};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use spamscan_core::Label;
use std::sync::Arc;
use tracing::{debug, error, info_span};
use uuid::Uuid;

// ============================================================================
// Screens
// ============================================================================

pub async fn landing() -> Html<String> {
    show(Screen::Landing)
}

pub async fn detection() -> Html<String> {
    show(Screen::Detection)
}

/// Fresh shell navigated to `screen`
fn show(screen: Screen) -> Html<String> {
    let mut shell = Shell::new();
    shell.navigate(screen);
    Html(pages::render(&shell, None))
}

#[derive(Debug, Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    pub text: String,
}

/// The Check button: classify the submitted text and re-render the screen
pub async fn submit_check(
    State(state): State<AppState>,
    Form(form): Form<CheckForm>,
) -> Html<String> {
    let shell = Shell::detecting(form.text);
    let outcome = run_check(&state, shell.clone(), Uuid::new_v4()).await;
    Html(pages::render(&shell, Some(&outcome)))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(pages::not_found()))
}

// ============================================================================
// JSON API
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub request_id: String,
    pub label: Label,
    pub display: String,
    pub spam: bool,
    pub confidence: f64,
    pub messages: Vec<String>,
}

pub async fn api_check(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> Response {
    let request_id = Uuid::new_v4();
    let outcome = run_check(&state, Shell::detecting(req.text), request_id).await;
    let messages: Vec<String> = outcome.messages().into_iter().map(|m| m.text).collect();

    match outcome {
        CheckOutcome::Verdict(result) => Json(CheckResponse {
            request_id: request_id.to_string(),
            label: result.label,
            display: result.label.display_name().to_string(),
            spam: result.is_spam(),
            confidence: result.confidence,
            messages,
        })
        .into_response(),
        CheckOutcome::Warning(warning) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": warning, "request_id": request_id.to_string() })),
        )
            .into_response(),
        CheckOutcome::Failed(reason) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": reason, "request_id": request_id.to_string() })),
        )
            .into_response(),
    }
}

// ============================================================================
// Metrics
// ============================================================================

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.render_metrics(),
    )
}

/// Run the shell's check off the async runtime; the pipeline is blocking
async fn run_check(state: &AppState, shell: Shell, request_id: Uuid) -> CheckOutcome {
    let predictor = Arc::clone(&state.predictor);
    let span = info_span!("check", %request_id);

    let result = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        shell.check(predictor.as_ref())
    })
    .await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(%request_id, "Check task failed: {}", e);
            CheckOutcome::Failed(format!("check task failed: {}", e))
        }
    };

    let kind = match &outcome {
        CheckOutcome::Verdict(_) => "verdict",
        CheckOutcome::Warning(_) => "warning",
        CheckOutcome::Failed(_) => "failed",
    };
    metrics::counter!("spamscan_checks_total", "outcome" => kind).increment(1);
    debug!(%request_id, outcome = kind, "Check handled");

    outcome
}
