// Password-gated roster endpoint.
//
// `POST /get-data` with `{"password": "..."}` answers with the roster sheet
// as CSV text. The sheet URL and the password stay on this side; clients
// only ever see the CSV.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use showcase_core::config::Config;

pub const DATA_PATH: &str = "/get-data";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Secrets and settings shared by every request. Read-only after startup.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub password: Option<String>,
    pub sheet_url: Option<String>,
    /// Delay before answering a rejected password.
    pub failure_delay: Duration,
    pub http: reqwest::Client,
}

impl GatewayState {
    /// Build from loaded config, with `password_env` / `sheet_url_env`
    /// (the `APP_PASSWORD` / `SHEET_URL` variables) taking precedence over
    /// credentials.toml.
    pub fn from_config(
        config: &Config,
        password_env: Option<String>,
        sheet_url_env: Option<String>,
    ) -> Self {
        GatewayState {
            password: first_set(password_env, config.credentials.app_password.clone()),
            sheet_url: first_set(sheet_url_env, config.credentials.sheet_url.clone()),
            failure_delay: Duration::from_millis(config.gateway.failure_delay_ms),
            http: reqwest::Client::new(),
        }
    }
}

/// First value that is present and not blank.
fn first_set(primary: Option<String>, secondary: Option<String>) -> Option<String> {
    [primary, secondary]
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("malformed request body: {0}")]
    BadRequest(#[from] serde_json::Error),

    #[error("password rejected")]
    Unauthorized,

    #[error("no sheet URL configured")]
    MissingSheetUrl,

    #[error("failed to fetch sheet: {source}")]
    Upstream {
        #[source]
        source: reqwest::Error,
    },

    #[error("sheet fetch returned status {status}")]
    UpstreamStatus { status: StatusCode },
}

impl GatewayError {
    fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::MissingSheetUrl
            | GatewayError::Upstream { .. }
            | GatewayError::UpstreamStatus { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Upstream details stay in the log.
    fn public_message(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "Bad Request",
            GatewayError::Unauthorized => "Unauthorized",
            GatewayError::MissingSheetUrl => "Server Configuration Error",
            GatewayError::Upstream { .. } | GatewayError::UpstreamStatus { .. } => {
                "Internal Server Error"
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route(DATA_PATH, post(get_data).fallback(method_not_allowed))
        .with_state(Arc::new(state))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    password: Option<String>,
}

async fn get_data(State(state): State<Arc<GatewayState>>, body: Bytes) -> Response {
    match fetch_roster(&state, &body).await {
        Ok(csv_text) => (
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CACHE_CONTROL, "no-store, max-age=0"),
            ],
            csv_text,
        )
            .into_response(),
        Err(e) => {
            match &e {
                GatewayError::BadRequest(_) | GatewayError::Unauthorized => warn!("{e}"),
                _ => error!("{e}"),
            }
            e.into_response()
        }
    }
}

async fn fetch_roster(state: &GatewayState, body: &[u8]) -> Result<String, GatewayError> {
    let request: LoginRequest = serde_json::from_slice(body)?;

    let accepted = match (&request.password, &state.password) {
        (Some(given), Some(expected)) => !given.is_empty() && given == expected,
        _ => false,
    };
    if !accepted {
        tokio::time::sleep(state.failure_delay).await;
        return Err(GatewayError::Unauthorized);
    }

    let Some(sheet_url) = state.sheet_url.as_deref() else {
        return Err(GatewayError::MissingSheetUrl);
    };

    let response = state
        .http
        .get(sheet_url)
        .send()
        .await
        .map_err(|source| GatewayError::Upstream { source })?;
    let status = response.status();
    if !status.is_success() {
        return Err(GatewayError::UpstreamStatus { status });
    }
    let csv_text = response
        .text()
        .await
        .map_err(|source| GatewayError::Upstream { source })?;

    info!("served roster sheet ({} bytes)", csv_text.len());
    Ok(csv_text)
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}
