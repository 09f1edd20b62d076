//! Dashboard controller: owns the view state and drives fetch cycles.
//!
//! A cycle is split in three steps so the async part stays free of state:
//! 1. `begin` / `submit_search` move the view to `Loading` and hand out a [`Ticket`]
//! 2. [`run_cycle`] talks to the provider and produces a [`CycleOutcome`]
//! 3. `finish` applies the outcome, unless a newer cycle has started since
//!
//! `mount` and `search` chain the three steps for callers that run one cycle at a time.

use tracing::{error, info, warn};

use crate::{
    location::Geolocator,
    model::{CurrentConditions, ForecastEntry, LocationQuery, ViewState},
    provider::WeatherProvider,
};

pub const LOCATION_DENIED_MESSAGE: &str = "Location access denied. Please enter a city manually.";
pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name.";
pub const FETCH_FAILED_MESSAGE: &str = "City not found or API error. Please try again.";

/// Identifies one fetch cycle. Only the most recently issued ticket may update the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Result of a fetch cycle, before it is applied to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Current conditions arrived. `forecast` is `None` if the second call failed.
    Fetched {
        current: CurrentConditions,
        forecast: Option<Vec<ForecastEntry>>,
    },
    WeatherFailed,
    LocationDenied,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    city_input: String,
    view: ViewState,
    latest: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Pending, not yet submitted, city input.
    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    pub fn set_city_input(&mut self, input: impl Into<String>) {
        self.city_input = input.into();
    }

    /// Start a new cycle: the view shows `Loading` and every earlier ticket goes stale.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.view = ViewState::Loading;
        Ticket(self.latest)
    }

    /// Validate the pending input and start a cycle for it.
    ///
    /// Returns `None` (and shows the validation message) when the input is blank.
    /// On success the input field is cleared.
    pub fn submit_search(&mut self) -> Option<(Ticket, LocationQuery)> {
        let city = self.city_input.trim();
        if city.is_empty() {
            self.view = ViewState::Failed(EMPTY_CITY_MESSAGE.to_string());
            return None;
        }

        let query = LocationQuery::City(city.to_string());
        self.city_input.clear();
        Some((self.begin(), query))
    }

    /// Apply a finished cycle. Returns `false` if the ticket was stale and the outcome dropped.
    pub fn finish(&mut self, ticket: Ticket, outcome: CycleOutcome) -> bool {
        if ticket.0 != self.latest {
            info!(?ticket, latest = self.latest, "discarding stale weather response");
            return false;
        }

        self.view = match outcome {
            CycleOutcome::Fetched { current, forecast } => ViewState::Ready { current, forecast },
            CycleOutcome::WeatherFailed => ViewState::Failed(FETCH_FAILED_MESSAGE.to_string()),
            CycleOutcome::LocationDenied => {
                ViewState::Failed(LOCATION_DENIED_MESSAGE.to_string())
            }
        };
        true
    }

    /// Initial load: resolve the platform location and fetch weather for it.
    pub async fn mount(&mut self, geolocator: &dyn Geolocator, provider: &dyn WeatherProvider) {
        let ticket = self.begin();

        let outcome = match geolocator.locate().await {
            Ok(coords) => run_cycle(provider, &LocationQuery::Coordinates(coords)).await,
            Err(err) => {
                warn!(error = %err, "geolocation unavailable");
                CycleOutcome::LocationDenied
            }
        };

        self.finish(ticket, outcome);
    }

    /// Manual search for the pending city input.
    pub async fn search(&mut self, provider: &dyn WeatherProvider) {
        let Some((ticket, query)) = self.submit_search() else {
            return;
        };

        let outcome = run_cycle(provider, &query).await;
        self.finish(ticket, outcome);
    }
}

/// Fetch current conditions, then the forecast for the city name the API resolved.
///
/// A failed current-conditions call ends the cycle without touching the forecast
/// endpoint. A failed forecast call is logged and otherwise ignored.
pub async fn run_cycle(provider: &dyn WeatherProvider, query: &LocationQuery) -> CycleOutcome {
    let current = match provider.current(query).await {
        Ok(current) => current,
        Err(err) => {
            error!(%query, error = %err, "error fetching weather data");
            return CycleOutcome::WeatherFailed;
        }
    };

    let forecast = match provider.forecast(&current.city_name).await {
        Ok(list) => Some(list),
        Err(err) => {
            warn!(city = %current.city_name, error = %err, "error fetching forecast data");
            None
        }
    };

    info!(
        city = %current.city_name,
        forecast_entries = forecast.as_ref().map_or(0, Vec::len),
        "weather loaded"
    );
    CycleOutcome::Fetched { current, forecast }
}
