use thiserror::Error;

/// Failures of a single call to the weather API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to send request to OpenWeather ({endpoint}): {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeather {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse OpenWeather {endpoint} JSON: {source}")]
    Parse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("OpenWeather {endpoint} response is missing `{field}`")]
    MissingField {
        endpoint: &'static str,
        field: &'static str,
    },
}

/// Failures of the location capability.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location access denied")]
    Denied,

    #[error("location service unavailable")]
    Unsupported,

    #[error("location lookup failed: {0}")]
    Lookup(String),
}

impl From<reqwest::Error> for LocationError {
    fn from(err: reqwest::Error) -> Self {
        LocationError::Lookup(err.to_string())
    }
}
