use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::FetchError,
    model::{CurrentConditions, ForecastEntry, LocationQuery},
};

use super::WeatherProvider;

/// OpenWeather 2.5 API client. Temperatures are requested in the API's default Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key, base_url)
    }

    pub fn with_client(
        http: Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, ?params, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(&params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwCurrentMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_max: f64,
    temp_min: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = FetchError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let weather = parsed.weather.into_iter().next().ok_or(FetchError::MissingField {
            endpoint: "weather",
            field: "weather[0]",
        })?;

        Ok(CurrentConditions {
            city_name: parsed.name,
            country_code: parsed.sys.country,
            temperature_kelvin: parsed.main.temp,
            description: weather.description,
            icon_id: weather.icon,
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = FetchError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let weather = entry.weather.into_iter().next().ok_or(FetchError::MissingField {
            endpoint: "forecast",
            field: "list[].weather[0]",
        })?;

        Ok(ForecastEntry {
            timestamp: entry.dt,
            temp_max_kelvin: entry.main.temp_max,
            temp_min_kelvin: entry.main.temp_min,
            description: weather.description,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, FetchError> {
        let parsed: OwCurrentResponse = self.get_json("weather", query.params()).await?;
        parsed.try_into()
    }

    async fn forecast(&self, city_name: &str) -> Result<Vec<ForecastEntry>, FetchError> {
        let parsed: OwForecastResponse = self
            .get_json("forecast", vec![("q", city_name.to_string())])
            .await?;

        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
