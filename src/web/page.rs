//! Server-side rendering of the converter page.
use crate::core::currency::CurrencyCode;
use crate::core::error::ConverterError;
use crate::core::session::Session;
use askama::Template;

pub struct CurrencyOption {
    pub code: &'static str,
    pub selected: bool,
}

pub struct AlertView {
    pub title: &'static str,
    pub text: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct PageTemplate<'a> {
    pub session: &'a Session,
    pub status_line: String,
    pub from_options: Vec<CurrencyOption>,
    pub to_options: Vec<CurrencyOption>,
    pub alert: Option<AlertView>,
}

fn currency_options(selected: CurrencyCode) -> Vec<CurrencyOption> {
    CurrencyCode::ALL
        .iter()
        .map(|code| CurrencyOption {
            code: code.as_str(),
            selected: *code == selected,
        })
        .collect()
}

impl<'a> PageTemplate<'a> {
    pub fn new(session: &'a Session, alert: Option<&ConverterError>) -> Self {
        PageTemplate {
            session,
            status_line: session.status_line(),
            from_options: currency_options(session.base),
            to_options: currency_options(session.target),
            alert: alert.map(|e| AlertView {
                title: e.alert_title(),
                text: e.alert_text(),
            }),
        }
    }
}

/// Renders the whole page for `session`, with an optional error banner.
pub fn render(session: &Session, alert: Option<&ConverterError>) -> askama::Result<String> {
    PageTemplate::new(session, alert).render()
}
