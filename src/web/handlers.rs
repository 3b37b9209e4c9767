use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::core::currency::CurrencyCode;
use crate::core::error::ConverterError;
use crate::core::session::{RATE_PLACEHOLDER, RESULT_PLACEHOLDER, STATUS_READY, Session};
use crate::web::{AppState, page};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("{0}")]
    BadRequest(String),
    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl From<ConverterError> for WebError {
    fn from(err: ConverterError) -> Self {
        WebError::BadRequest(err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Render(e) => {
                error!(error = %e, "Page rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Convert,
    Clear,
    Refresh,
    Swap,
}

impl FromStr for Action {
    type Err = WebError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "convert" => Ok(Action::Convert),
            "clear" => Ok(Action::Clear),
            "refresh" => Ok(Action::Refresh),
            "swap" => Ok(Action::Swap),
            other => Err(WebError::BadRequest(format!("Unknown action: {other}"))),
        }
    }
}

/// Fields posted by the page. The session lives in the form between requests.
#[derive(Debug, Deserialize)]
pub struct PageForm {
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub amount: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub result_text: String,
    #[serde(default)]
    pub rate_text: String,
    #[serde(default)]
    pub status_text: String,
}

fn default_action() -> String {
    "convert".to_string()
}

fn or_default(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

impl PageForm {
    fn into_session(self) -> WebResult<Session> {
        Ok(Session {
            base: CurrencyCode::from_str(&self.from)?,
            target: CurrencyCode::from_str(&self.to)?,
            amount_text: self.amount,
            result_text: or_default(self.result_text, RESULT_PLACEHOLDER),
            rate_text: or_default(self.rate_text, RATE_PLACEHOLDER),
            status: or_default(self.status_text, STATUS_READY),
            ..Session::default()
        })
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> WebResult<Html<String>> {
    let mut session = Session::new();
    session.refresh_ticker(state.provider.as_ref()).await;
    Ok(Html(page::render(&session, None)?))
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PageForm>,
) -> WebResult<Html<String>> {
    let action = Action::from_str(&form.action)?;
    let mut session = form.into_session()?;
    debug!(?action, base = %session.base, target = %session.target, "Handling page action");

    let mut alert = None;
    match action {
        Action::Convert => {
            if let Err(e) = session.convert(state.provider.as_ref()).await {
                alert = Some(e);
            }
        }
        Action::Clear => session.clear(),
        Action::Refresh => {
            state.cache.clear().await;
            session.mark_refreshed();
        }
        Action::Swap => {
            session.swap();
        }
    }

    // The ticker is recomputed on every render, bounded by the rate cache.
    session.refresh_ticker(state.provider.as_ref()).await;
    Ok(Html(page::render(&session, alert.as_ref())?))
}

pub async fn health() -> &'static str {
    "ok"
}
