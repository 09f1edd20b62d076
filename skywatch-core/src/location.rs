//! Location capability used on start-up.
//!
//! A terminal has no browser geolocation prompt, so the capability is
//! pluggable: an IP lookup, coordinates given by the user, or nothing at all.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::{Config, error::LocationError, model::Coordinates};

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// IP-based lookup against an ipinfo.io-compatible endpoint.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    /// "latitude,longitude"
    loc: Option<String>,
    city: Option<String>,
    country: Option<String>,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let res = self.http.get(&self.url).send().await?;

        let status = res.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(LocationError::Denied);
        }
        if !status.is_success() {
            return Err(LocationError::Lookup(format!("status {status}")));
        }

        let info: IpInfoResponse = res.json().await?;
        debug!(city = ?info.city, country = ?info.country, "IP geolocation resolved");

        let loc = info
            .loc
            .ok_or_else(|| LocationError::Lookup("response has no `loc` field".into()))?;

        parse_loc(&loc).ok_or_else(|| LocationError::Lookup(format!("malformed `loc`: {loc}")))
    }
}

/// Coordinates supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl Geolocator for FixedLocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// No location capability on this platform (or the user turned it off).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Geolocator selected by config: IP lookup when enabled, nothing otherwise.
pub fn geolocator_from_config(config: &Config) -> Box<dyn Geolocator> {
    if config.geolocation {
        Box::new(IpGeolocator::new(config.endpoints.geolocation_url.clone()))
    } else {
        Box::new(NoGeolocation)
    }
}

fn parse_loc(loc: &str) -> Option<Coordinates> {
    let (lat, lon) = loc.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;

    let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
    valid.then_some(Coordinates { latitude, longitude })
}
