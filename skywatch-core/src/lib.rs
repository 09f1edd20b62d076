//! Core library for the SkyWatch weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and location capabilities
//! - The dashboard controller (view state, fetch cycles)
//! - The presenter that turns view state into a screen
//!
//! It is used by `skywatch-cli`, but can also be reused by other front-ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod location;
pub mod model;
pub mod present;
pub mod provider;

pub use config::{Config, Endpoints};
pub use dashboard::{CycleOutcome, Dashboard, Ticket, run_cycle};
pub use error::{FetchError, LocationError};
pub use location::{FixedLocation, Geolocator, IpGeolocator, NoGeolocation};
pub use model::{Coordinates, CurrentConditions, ForecastEntry, LocationQuery, ViewState};
pub use present::{Screen, celsius, present};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
