use crate::{
    Config,
    error::FetchError,
    model::{CurrentConditions, ForecastEntry, LocationQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and forecasts.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for coordinates or a city name.
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, FetchError>;

    /// 3-hourly forecast for a city name, in chronological order.
    async fn forecast(&self, city_name: &str) -> Result<Vec<ForecastEntry>, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::new(api_key, &config.endpoints.weather_base_url);

    Ok(Box::new(provider))
}
