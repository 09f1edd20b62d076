use serde::{Deserialize, Serialize};

/// Decimal-degree coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// What to ask the current-conditions endpoint for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Coordinates(Coordinates),
    City(String),
}

impl LocationQuery {
    /// Query parameters identifying the location (`lat`/`lon` or `q`).
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
            LocationQuery::City(name) => vec![("q", name.clone())],
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::Coordinates(c) => write!(f, "{},{}", c.latitude, c.longitude),
            LocationQuery::City(name) => f.write_str(name),
        }
    }
}

/// Present weather for a resolved location, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city_name: String,
    pub country_code: String,
    pub temperature_kelvin: f64,
    pub description: String,
    pub icon_id: String,
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub temp_max_kelvin: f64,
    pub temp_min_kelvin: f64,
    pub description: String,
}

/// What the dashboard is currently showing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    /// Current conditions fetched. `forecast` is `None` when the forecast call failed.
    Ready {
        current: CurrentConditions,
        forecast: Option<Vec<ForecastEntry>>,
    },
    /// A user-facing message.
    Failed(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&CurrentConditions> {
        match self {
            ViewState::Ready { current, .. } => Some(current),
            _ => None,
        }
    }

    pub fn forecast(&self) -> Option<&[ForecastEntry]> {
        match self {
            ViewState::Ready { forecast: Some(list), .. } => Some(list.as_slice()),
            _ => None,
        }
    }
}
