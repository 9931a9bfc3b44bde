//! Fetch, display, persist.
//!
//! [`WeatherController`] owns the screen state and publishes every change on
//! a [`tokio::sync::watch`] channel. A lookup moves the state through
//! `Fetching` into either `Displayed` or `Errored`. Successful lookups spawn a
//! background task that appends a [`HistoryRecord`]; failed ones never do.

use chrono::{DateTime, Local};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    config::ErrorPolicy,
    display::{DisplayFields, history_record},
    error::WeatherError,
    model::HistoryRecord,
    repository::WeatherRepository,
    theme::{Theme, next_theme},
};

pub type Clock = fn() -> DateTime<Local>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
    Displayed,
    Errored,
}

/// Everything the screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub phase: Phase,
    /// Last successful lookup; failures leave it untouched.
    pub display: Option<DisplayFields>,
    pub theme: Option<Theme>,
    /// Message from the most recent failure, cleared by the next success.
    pub error: Option<String>,
}

impl ViewState {
    /// The error message, if the policy says the user should see it.
    pub fn notice(&self, policy: ErrorPolicy) -> Option<&str> {
        match policy {
            ErrorPolicy::Surface => self.error.as_deref(),
            ErrorPolicy::Suppress => None,
        }
    }
}

/// Completion handle for the history write started by a successful lookup.
///
/// Dropping it detaches the write; it still runs and logs its own failure.
#[derive(Debug)]
pub struct PersistHandle(JoinHandle<Result<(), WeatherError>>);

impl PersistHandle {
    pub async fn wait(self) -> Result<(), WeatherError> {
        self.0.await?
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Displayed(PersistHandle),
    Errored(String),
}

impl FetchOutcome {
    pub fn is_displayed(&self) -> bool {
        matches!(self, FetchOutcome::Displayed(_))
    }

    /// Wait for the history write, if there is one.
    pub async fn persisted(self) -> Result<(), WeatherError> {
        match self {
            FetchOutcome::Displayed(handle) => handle.wait().await,
            FetchOutcome::Errored(_) => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct WeatherController {
    repository: WeatherRepository,
    default_city: String,
    clock: Clock,
    state: watch::Sender<ViewState>,
}

impl WeatherController {
    pub fn new(repository: WeatherRepository, default_city: impl Into<String>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self { repository, default_city: default_city.into(), clock: Local::now, state }
    }

    /// Replace the source of "now" used for the date lines and history records.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Initial lookup for the configured city.
    pub async fn load_default(&self) -> FetchOutcome {
        let city = self.default_city.clone();
        self.fetch_weather(&city).await
    }

    /// Look up `city` (any text, not validated) and update the screen state.
    pub async fn fetch_weather(&self, city: &str) -> FetchOutcome {
        self.state.send_modify(|s| s.phase = Phase::Fetching);

        match self.repository.get_weather(city).await {
            Ok(snapshot) => {
                let now = (self.clock)();
                let display = DisplayFields::from_snapshot(&snapshot, &now);
                let record = history_record(city, &snapshot, &now);

                self.state.send_modify(|s| {
                    s.phase = Phase::Displayed;
                    s.theme = next_theme(s.theme, &snapshot.condition);
                    s.display = Some(display);
                    s.error = None;
                });
                info!(city, condition = %snapshot.condition, "weather displayed");

                FetchOutcome::Displayed(self.persist(record))
            }
            Err(err) => {
                let message = err.to_string();
                warn!(city, error = %message, "weather lookup failed");

                self.state.send_modify(|s| {
                    s.phase = Phase::Errored;
                    s.error = Some(message.clone());
                });

                FetchOutcome::Errored(message)
            }
        }
    }

    /// Full history, oldest first. Reads on the blocking pool.
    pub async fn history(&self) -> Result<Vec<HistoryRecord>, WeatherError> {
        self.repository.get_history().await
    }

    fn persist(&self, record: HistoryRecord) -> PersistHandle {
        let repository = self.repository.clone();

        PersistHandle(tokio::spawn(async move {
            let city = record.city_name.clone();
            let result = repository.save_history(record).await;
            if let Err(err) = &result {
                warn!(%city, error = %err, "failed to save weather history");
            }
            result
        }))
    }
}
