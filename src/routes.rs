use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::admin;
use crate::infra::{AppState, Submission};
use crate::intake::service::SubmissionOutcome;
use crate::intake::store::StoreError;
use crate::intake::{ApplicationForm, CaregiverForm, ParentForm, SubmissionKind};

const SUBMIT_FAILURE: &str = "We couldn't submit right now. Please try again in a moment.";
const APPLICATION_FAILURE: &str =
    "We couldn't submit your application right now. Please try again.";

/// Full route table for the service.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/parents", get(parents_page))
        .route("/caregivers", get(caregivers_page))
        .route("/join", get(network_page))
        .route("/nanny-network", get(network_page))
        .route("/thank-you", get(thank_you_page))
        .route("/healthz", get(healthcheck))
        .route("/api/parents", post(submit_parent))
        .route("/api/caregivers", post(submit_caregiver))
        .route("/api/caregivers/apply", post(submit_application))
        .route(
            "/admin/login",
            get(admin::login_page).post(admin::login_submit),
        )
        .route("/admin/logout", get(admin::logout))
        .route("/admin", get(admin::dashboard))
        .route("/admin/export.csv", get(admin::export_csv))
        .with_state(state)
}

async fn submit_parent(
    State(state): State<AppState>,
    submission: Submission<ParentForm>,
) -> Response {
    let outcome = state.service.submit_parent(submission.body);
    respond(
        outcome,
        SubmissionKind::Parent,
        submission.wants_json,
        SUBMIT_FAILURE,
    )
}

async fn submit_caregiver(
    State(state): State<AppState>,
    submission: Submission<CaregiverForm>,
) -> Response {
    let outcome = state.service.submit_caregiver(submission.body);
    respond(
        outcome,
        SubmissionKind::Caregiver,
        submission.wants_json,
        SUBMIT_FAILURE,
    )
}

async fn submit_application(
    State(state): State<AppState>,
    submission: Submission<ApplicationForm>,
) -> Response {
    let outcome = state.service.submit_application(submission.body);
    respond(
        outcome,
        SubmissionKind::Nanny,
        submission.wants_json,
        APPLICATION_FAILURE,
    )
}

/// Translate a submission outcome into the response contract: bot and
/// non-JSON successes redirect to the thank-you page, validation problems are
/// a 400 with the full error map, storage failures are a generic 500.
fn respond(
    outcome: Result<SubmissionOutcome, StoreError>,
    kind: SubmissionKind,
    wants_json: bool,
    failure_copy: &str,
) -> Response {
    let thank_you = format!("/thank-you?type={}", kind.thank_you_type());
    match outcome {
        Ok(SubmissionOutcome::Bot) => Redirect::to(&thank_you).into_response(),
        Ok(SubmissionOutcome::Invalid(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "errors": errors })),
        )
            .into_response(),
        Ok(SubmissionOutcome::Accepted { duplicate }) => {
            if wants_json {
                Json(json!({ "ok": true, "duplicate": duplicate })).into_response()
            } else {
                Redirect::to(&thank_you).into_response()
            }
        }
        Err(err) => {
            error!(%err, kind = kind.thank_you_type(), "failed to persist submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": failure_copy })),
            )
                .into_response()
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

// Page rendering proper lives outside this core; these shells keep the route
// surface complete and carry the deployed titles.

async fn home_page() -> Html<String> {
    page(
        "Overnight Newborn Care in Lake Tahoe & Truckee | Tahoe Night Nurse",
        "Trusted overnight newborn care for 0-6 months in Lake Tahoe & Truckee. \
         Join the parent interest list or apply as a night-nurse caregiver.",
    )
}

async fn parents_page() -> Html<String> {
    page(
        "Parent Interest Form | Tahoe Night Nurse",
        "Tell us about your family and timing. We'll keep you posted as availability \
         opens in Lake Tahoe & Truckee.",
    )
}

async fn caregivers_page() -> Html<String> {
    page(
        "Caregiver Application | Tahoe Night Nurse",
        "Apply to be considered for overnight newborn care opportunities in the Tahoe area.",
    )
}

async fn network_page() -> Html<String> {
    page(
        "Join Our Network | Tahoe Night Nurse",
        "Join the premier night nanny network in Lake Tahoe & Truckee. Premium rates, \
         vetted families, flexible scheduling.",
    )
}

#[derive(Debug, Deserialize)]
struct ThankYouQuery {
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

async fn thank_you_page(Query(query): Query<ThankYouQuery>) -> Html<String> {
    let kind = query.kind.unwrap_or_else(|| "parent".to_string());
    let lead = match kind.as_str() {
        "caregiver" => "Thank you for applying. We'll review your application and reach out.",
        "nanny" => "Thank you for applying to the nanny network. We'll be in touch soon.",
        _ => "Thank you for your interest. We'll keep you posted as availability opens.",
    };
    page("Thank You | Tahoe Night Nurse", lead)
}

fn page(title: &str, lead: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\
         <html lang=\"en\">\
         <head><meta charset=\"utf-8\"><title>{title}</title>\
         <meta name=\"description\" content=\"{lead}\"></head>\
         <body><h1>{title}</h1><p>{lead}</p></body>\
         </html>"
    ))
}
