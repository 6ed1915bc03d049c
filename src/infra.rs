use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::config::AdminCredentials;
use crate::intake::IntakeService;

/// Shared state for every request handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IntakeService>,
    pub sessions: Arc<AdminSessions>,
    pub admin: AdminCredentials,
}

/// Server-side registry of active admin session tokens. The cookie carries an
/// opaque v4 UUID; authorization is the token's presence here.
#[derive(Default)]
pub struct AdminSessions {
    tokens: Mutex<HashSet<String>>,
}

impl AdminSessions {
    pub fn issue(&self) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .lock()
            .expect("session mutex poisoned")
            .insert(token.clone());
        token
    }

    pub fn revoke(&self, token: &str) {
        self.tokens
            .lock()
            .expect("session mutex poisoned")
            .remove(token);
    }

    pub fn is_active(&self, token: &str) -> bool {
        self.tokens
            .lock()
            .expect("session mutex poisoned")
            .contains(token)
    }
}

/// Extracts a submission body from either an urlencoded form post or a JSON
/// request, remembering which shape the client spoke so the handler can pick
/// between a JSON acknowledgment and a redirect.
pub struct Submission<T> {
    pub body: T,
    pub wants_json: bool,
}

#[async_trait]
impl<S, T> FromRequest<S> for Submission<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let wants_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("json"));

        if wants_json {
            let Json(body) = Json::<T>::from_request(req, state)
                .await
                .map_err(|err| malformed(err.to_string()))?;
            Ok(Self {
                body,
                wants_json: true,
            })
        } else {
            let Form(body) = Form::<T>::from_request(req, state)
                .await
                .map_err(|err| malformed(err.to_string()))?;
            Ok(Self {
                body,
                wants_json: false,
            })
        }
    }
}

fn malformed(detail: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "ok": false, "error": format!("malformed submission: {detail}") })),
    )
        .into_response()
}
