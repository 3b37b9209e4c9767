//! Terminal window front-end.
//!
//! One task owns the [`DesktopApp`] and the terminal. Key presses are read on
//! a dedicated thread, conversions and ticker fetches run on spawned tasks,
//! and every outcome comes back as a [`DesktopEvent`] on a single channel, so
//! the session has exactly one writer.

use super::ui::{self, StyleType};
use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::convert::{self, ConversionRequest, ConversionResult};
use crate::core::currency::{CurrencyCode, RateProvider, RateSnapshot};
use crate::core::error::ConverterError;
use crate::core::session::Session;
use crate::core::ticker::Marquee;
use crate::providers::{CachingRateProvider, OpenErApiProvider};
use crate::store::memory::MemoryCache;
use anyhow::{Context, Result, bail};
use console::{Key, Term};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

const TICKER_GAP: &str = "   ";

#[derive(Debug)]
pub enum DesktopEvent {
    Key(Key),
    Converted(Result<ConversionResult, ConverterError>),
    TickerFetched(Result<RateSnapshot, ConverterError>),
    TickerDue,
    Animate,
}

/// Work the event loop must start on behalf of the app.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    FetchTicker(CurrencyCode),
    /// Timer reload: skip the cached snapshot for this base.
    ReloadTicker(CurrencyCode),
    /// Drop cached snapshots, then fetch the ticker.
    Refresh(CurrencyCode),
    Convert(ConversionRequest),
    Quit,
}

/// A blocking message; the next key press dismisses it.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: &'static str,
    pub text: String,
}

impl From<&ConverterError> for Alert {
    fn from(err: &ConverterError) -> Self {
        Alert {
            title: err.alert_title(),
            text: err.alert_text(),
        }
    }
}

pub struct DesktopApp {
    pub session: Session,
    pub alert: Option<Alert>,
    marquee: Marquee,
}

impl Default for DesktopApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopApp {
    pub fn new() -> Self {
        let session = Session::new();
        let marquee = Marquee::new(&format!("{TICKER_GAP}{}{TICKER_GAP}", session.ticker_text));
        Self {
            session,
            alert: None,
            marquee,
        }
    }

    pub fn handle(&mut self, event: DesktopEvent) -> Option<Effect> {
        match event {
            DesktopEvent::Key(key) => self.handle_key(key),
            DesktopEvent::Converted(outcome) => {
                if let Err(e) = self.session.finish_conversion(outcome) {
                    self.alert = Some(Alert::from(&e));
                }
                None
            }
            DesktopEvent::TickerFetched(outcome) => {
                self.session.apply_ticker(outcome);
                self.marquee
                    .set_text(&format!("{}{TICKER_GAP}", self.session.ticker_text));
                None
            }
            DesktopEvent::TickerDue => Some(Effect::ReloadTicker(self.session.base)),
            DesktopEvent::Animate => {
                self.marquee.advance();
                None
            }
        }
    }

    fn handle_key(&mut self, key: Key) -> Option<Effect> {
        if key == Key::CtrlC {
            return Some(Effect::Quit);
        }
        if self.alert.take().is_some() {
            return None;
        }

        match key {
            Key::Enter => match self.session.begin_conversion() {
                Ok(request) => Some(Effect::Convert(request)),
                Err(e) => {
                    self.alert = Some(Alert::from(&e));
                    None
                }
            },
            Key::Tab => Some(Effect::FetchTicker(self.session.swap())),
            Key::Escape => {
                self.session.clear();
                None
            }
            Key::ArrowLeft => {
                self.session.base = self.session.base.previous();
                None
            }
            Key::ArrowRight => {
                self.session.base = self.session.base.next();
                None
            }
            Key::ArrowUp => {
                self.session.target = self.session.target.previous();
                None
            }
            Key::ArrowDown => {
                self.session.target = self.session.target.next();
                None
            }
            Key::Backspace => {
                self.session.amount_text.pop();
                None
            }
            Key::Char('q') => Some(Effect::Quit),
            Key::Char('r') => {
                self.session.mark_refreshed();
                Some(Effect::Refresh(self.session.base))
            }
            Key::Char(c) if c.is_ascii_digit() || c == '.' || c == ',' => {
                self.session.amount_text.push(c);
                None
            }
            _ => None,
        }
    }

    /// Lines of the window for a terminal `width` columns wide.
    pub fn render(&self, width: usize) -> Vec<String> {
        let width = width.max(20);
        let session = &self.session;
        let mut lines = vec![
            ui::style_text("💱 Currency Converter", StyleType::Title),
            ui::style_text("Live rates • Swap • Clear • Rate display", StyleType::Subtle),
            ui::separator(width),
            ui::style_text(&self.marquee.frame(width), StyleType::Ticker),
            ui::separator(width),
            format!("Amount: {}_", session.amount_text),
            format!(
                "{}   ⇄   {}",
                ui::selector("From", session.base.as_str()),
                ui::selector("To", session.target.as_str())
            ),
            ui::style_text(
                "[Enter] Convert  [Tab] Swap  [Esc] Clear  [r] Refresh  [←/→] From  [↑/↓] To  [q] Quit",
                StyleType::Hint,
            ),
            String::new(),
            ui::style_text(&session.result_text, StyleType::Result),
            session.rate_text.clone(),
            ui::style_text(&session.status_line(), StyleType::Subtle),
        ];

        if let Some(alert) = &self.alert {
            lines.push(String::new());
            lines.push(ui::style_text(
                &format!("[{}] {}  (press any key)", alert.title, alert.text),
                StyleType::Error,
            ));
        }
        lines
    }
}

fn spawn_key_reader(term: Term, tx: UnboundedSender<DesktopEvent>) {
    // A plain thread: a blocked read_key must not hold up runtime shutdown.
    std::thread::spawn(move || {
        while let Ok(key) = term.read_key() {
            if tx.send(DesktopEvent::Key(key)).is_err() {
                break;
            }
        }
    });
}

/// Starts network work off the UI task and posts the outcome back as an event.
struct Fetcher {
    provider: Arc<dyn RateProvider>,
    cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>>,
    tx: UnboundedSender<DesktopEvent>,
}

impl Fetcher {
    fn ticker(&self, base: CurrencyCode) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = provider.fetch_rates(base).await;
            let _ = tx.send(DesktopEvent::TickerFetched(outcome));
        });
    }

    /// A timer tick can land just inside the TTL of the previous tick's
    /// snapshot, so the entry for `base` is dropped first.
    async fn reload_ticker(&self, base: CurrencyCode) {
        self.cache.remove(&base).await;
        self.ticker(base);
    }

    async fn refresh(&self, base: CurrencyCode) {
        self.cache.clear().await;
        info!(%base, "Dropped cached rates");
        self.ticker(base);
    }

    fn convert(&self, request: ConversionRequest) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = convert::perform(request, provider.as_ref()).await;
            let _ = tx.send(DesktopEvent::Converted(outcome));
        });
    }
}

fn draw(term: &Term, app: &DesktopApp) -> Result<()> {
    let (_, columns) = term.size();
    term.move_cursor_to(0, 0)?;
    for line in app.render(columns as usize) {
        term.clear_line()?;
        term.write_line(&line)?;
    }
    term.clear_to_end_of_screen()?;
    Ok(())
}

async fn event_loop(
    term: &Term,
    app: &mut DesktopApp,
    provider: Arc<dyn RateProvider>,
    cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>>,
    config: &AppConfig,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_key_reader(term.clone(), tx.clone());
    let fetcher = Fetcher {
        provider,
        cache,
        tx,
    };

    // The first refresh tick fires immediately and loads the ticker.
    let mut ticker_refresh = interval(config.ticker.refresh_interval());
    ticker_refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut animation = interval(config.ticker.scroll_interval());
    animation.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            Some(event) = rx.recv() => event,
            _ = ticker_refresh.tick() => DesktopEvent::TickerDue,
            _ = animation.tick() => DesktopEvent::Animate,
        };

        match app.handle(event) {
            Some(Effect::Quit) => return Ok(()),
            Some(Effect::FetchTicker(base)) => {
                debug!(%base, "Fetching ticker rates");
                fetcher.ticker(base);
            }
            Some(Effect::ReloadTicker(base)) => {
                debug!(%base, "Reloading ticker rates");
                fetcher.reload_ticker(base).await;
            }
            Some(Effect::Refresh(base)) => fetcher.refresh(base).await,
            Some(Effect::Convert(request)) => {
                debug!(?request, "Starting conversion");
                fetcher.convert(request);
            }
            None => {}
        }

        draw(term, app)?;
    }
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let cache: Arc<dyn Cache<CurrencyCode, RateSnapshot>> = Arc::new(MemoryCache::new());
    let provider: Arc<dyn RateProvider> = Arc::new(CachingRateProvider::new(
        OpenErApiProvider::new(&config.provider)?,
        Arc::clone(&cache),
        config.cache_ttl(),
    ));

    let term = Term::stdout();
    if !term.is_term() {
        bail!("The desktop window needs an interactive terminal");
    }

    info!("Opening converter window");
    term.hide_cursor().context("Failed to prepare terminal")?;
    term.clear_screen()?;

    let mut app = DesktopApp::new();
    let result = event_loop(&term, &mut app, provider, cache, config).await;

    term.clear_screen()?;
    term.show_cursor()?;
    result
}
