//! Operator-only surface: login, dashboard, CSV export. Authorization is a
//! two-state session derived per request from the session cookie; anonymous
//! callers are redirected to the login view, never handed a bare 401.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Local;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::infra::{AdminSessions, AppState};
use crate::intake::export::{caregivers_csv, parents_csv};
use crate::intake::{CaregiverRecord, ParentRecord};

const SESSION_COOKIE: &str = "nn_admin";
const DASHBOARD_RECENT: usize = 10;
const SERVER_FAILURE: &str = "Something went wrong. Please try again.";

/// Per-request authorization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSession {
    Anonymous,
    Authenticated,
}

impl AdminSession {
    fn from_headers(headers: &HeaderMap, sessions: &AdminSessions) -> Self {
        match session_token(headers) {
            Some(token) if sessions.is_active(&token) => Self::Authenticated,
            _ => Self::Anonymous,
        }
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<(), Response> {
    match AdminSession::from_headers(headers, &state.sessions) {
        AdminSession::Authenticated => Ok(()),
        AdminSession::Anonymous => Err(Redirect::to("/admin/login").into_response()),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    error: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let error_banner = query
        .error
        .map(|message| format!("<p class=\"error\">{message}</p>"))
        .unwrap_or_default();

    Html(format!(
        "<!doctype html>\
         <html lang=\"en\">\
         <head><meta charset=\"utf-8\"><title>Admin Login | Tahoe Night Nurse</title></head>\
         <body><h1>Admin Login</h1>{error_banner}\
         <form method=\"post\" action=\"/admin/login\">\
         <label>Username <input name=\"username\" autocomplete=\"username\"></label>\
         <label>Password <input name=\"password\" type=\"password\" autocomplete=\"current-password\"></label>\
         <button type=\"submit\">Sign in</button>\
         </form></body></html>"
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Exact match against the configured credential pair flips the session to
/// authenticated; anything else bounces back to the login view.
pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if form.username == state.admin.username && form.password == state.admin.password {
        let token = state.sessions.issue();
        info!("admin login succeeded");
        let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400");
        ([(header::SET_COOKIE, cookie)], Redirect::to("/admin")).into_response()
    } else {
        warn!("admin login rejected");
        Redirect::to("/admin/login?error=Invalid%20credentials").into_response()
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.revoke(&token);
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(redirect) = require_admin(&headers, &state) {
        return redirect;
    }

    match (state.service.parents(), state.service.caregivers()) {
        (Ok(parents), Ok(caregivers)) => {
            Html(render_dashboard(&parents, &caregivers)).into_response()
        }
        (Err(err), _) | (_, Err(err)) => {
            error!(%err, "failed to load dashboard records");
            (StatusCode::INTERNAL_SERVER_ERROR, SERVER_FAILURE).into_response()
        }
    }
}

fn render_dashboard(parents: &[ParentRecord], caregivers: &[CaregiverRecord]) -> String {
    let mut body = format!(
        "<h1>Interest Dashboard</h1>\
         <p>{} parents on the list, {} caregiver applications.</p>",
        parents.len(),
        caregivers.len()
    );

    body.push_str("<h2>Recent parents</h2><ul>");
    for record in parents.iter().take(DASHBOARD_RECENT) {
        body.push_str(&format!(
            "<li>{} &lt;{}&gt; - {}</li>",
            record.full_name, record.email, record.start_timeframe
        ));
    }
    body.push_str("</ul><h2>Recent caregivers</h2><ul>");
    for record in caregivers.iter().take(DASHBOARD_RECENT) {
        body.push_str(&format!(
            "<li>{} &lt;{}&gt; - {}</li>",
            record.full_name, record.email, record.availability
        ));
    }
    body.push_str("</ul><p><a href=\"/admin/export.csv?type=parents\">Export parents</a> | \
                   <a href=\"/admin/export.csv?type=caregivers\">Export caregivers</a> | \
                   <a href=\"/admin/logout\">Log out</a></p>");

    format!(
        "<!doctype html>\
         <html lang=\"en\">\
         <head><meta charset=\"utf-8\"><title>Admin | Tahoe Night Nurse</title></head>\
         <body>{body}</body></html>"
    )
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Full dump of one collection as CSV, filename stamped with today's date.
pub async fn export_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> Response {
    if let Err(redirect) = require_admin(&headers, &state) {
        return redirect;
    }

    let kind = query.kind.unwrap_or_else(|| "parents".to_string());
    let document = if kind == "parents" {
        state
            .service
            .parents()
            .map_err(|err| err.to_string())
            .and_then(|records| parents_csv(&records).map_err(|err| err.to_string()))
    } else {
        state
            .service
            .caregivers()
            .map_err(|err| err.to_string())
            .and_then(|records| caregivers_csv(&records).map_err(|err| err.to_string()))
    };

    match document {
        Ok(csv) => {
            let filename = format!("{}-{}.csv", kind, Local::now().date_naive());
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(err) => {
            error!(%err, "failed to generate export");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating export").into_response()
        }
    }
}
