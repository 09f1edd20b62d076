//! Pure rendering of a [`ViewState`] into a screen model and text.

use chrono::{DateTime, TimeZone};
use std::fmt;

use crate::model::{CurrentConditions, ForecastEntry, ViewState};

pub const TITLE: &str = "SkyWatch : WEATHER Monitoring Dashboard";

const NEAR_TERM_ENTRIES: usize = 5;
/// 8 slots of 3 hours make one day.
const ENTRIES_PER_DAY: usize = 8;
const DAILY_ENTRIES: usize = 4;

/// Kelvin to whole degrees Celsius, rounding toward negative infinity.
pub fn celsius(kelvin: f64) -> i64 {
    (kelvin - 273.15).floor() as i64
}

/// The next few 3-hour slots, in the order the API returned them.
pub fn near_term(forecast: &[ForecastEntry]) -> &[ForecastEntry] {
    &forecast[..forecast.len().min(NEAR_TERM_ENTRIES)]
}

/// One slot per day, skipping today: every 8th entry, positions 1 to 4.
pub fn daily(forecast: &[ForecastEntry]) -> Vec<&ForecastEntry> {
    forecast
        .iter()
        .step_by(ENTRIES_PER_DAY)
        .skip(1)
        .take(DAILY_ENTRIES)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPanel {
    /// "City, CC"
    pub heading: String,
    pub celsius: i64,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRow {
    /// `HH:MM` for the near-term view, `Www Mmm dd yyyy` for the daily view.
    pub label: String,
    pub max_celsius: i64,
    pub min_celsius: i64,
    pub description: String,
}

/// Everything the dashboard shows for one state. At most one of loading, error, or weather.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Empty,
    Loading,
    Error(String),
    Weather {
        current: CurrentPanel,
        upcoming: Vec<ForecastRow>,
        days: Vec<ForecastRow>,
    },
}

/// Build the screen for `view`, formatting times in `tz`.
///
/// `icon_url` maps an icon id to its image URL (see `Config::icon_url`).
pub fn present<Tz, F>(view: &ViewState, tz: &Tz, icon_url: F) -> Screen
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    F: Fn(&str) -> String,
{
    match view {
        ViewState::Idle => Screen::Empty,
        ViewState::Loading => Screen::Loading,
        ViewState::Failed(msg) => Screen::Error(msg.clone()),
        ViewState::Ready { current, forecast } => {
            let forecast = forecast.as_deref().unwrap_or_default();
            Screen::Weather {
                current: current_panel(current, &icon_url),
                upcoming: near_term(forecast)
                    .iter()
                    .map(|f| row(f, tz, "%H:%M"))
                    .collect(),
                days: daily(forecast)
                    .into_iter()
                    .map(|f| row(f, tz, "%a %b %d %Y"))
                    .collect(),
            }
        }
    }
}

fn current_panel(current: &CurrentConditions, icon_url: impl Fn(&str) -> String) -> CurrentPanel {
    CurrentPanel {
        heading: format!("{}, {}", current.city_name, current.country_code),
        celsius: celsius(current.temperature_kelvin),
        description: current.description.clone(),
        icon_url: icon_url(&current.icon_id),
    }
}

fn row<Tz>(entry: &ForecastEntry, tz: &Tz, format: &str) -> ForecastRow
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let label = DateTime::from_timestamp(entry.timestamp, 0)
        .map(|utc| utc.with_timezone(tz).format(format).to_string())
        .unwrap_or_else(|| "--".to_string());

    ForecastRow {
        label,
        max_celsius: celsius(entry.temp_max_kelvin),
        min_celsius: celsius(entry.temp_min_kelvin),
        description: entry.description.clone(),
    }
}

impl fmt::Display for ForecastRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {} °C / {} °C  {}",
            self.label, self.max_celsius, self.min_celsius, self.description
        )
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f)?;

        match self {
            Screen::Empty => writeln!(f, "Enter a city name to see the weather."),
            Screen::Loading => writeln!(f, "Loading..."),
            Screen::Error(msg) => writeln!(f, "{msg}"),
            Screen::Weather { current, upcoming, days } => {
                writeln!(f, "{}", current.heading)?;
                writeln!(f, "  {} °C", current.celsius)?;
                writeln!(f, "  {}", current.description)?;
                writeln!(f, "  icon: {}", current.icon_url)?;

                if !upcoming.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "Upcoming forecast")?;
                    for r in upcoming {
                        writeln!(f, "  {r}")?;
                    }
                }

                if !days.is_empty() {
                    writeln!(f)?;
                    writeln!(f, "Next 4 days forecast")?;
                    for r in days {
                        writeln!(f, "  {r}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
