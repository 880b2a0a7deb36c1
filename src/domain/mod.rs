//! Bundled tool capabilities
//!
//! Weather and distance tools backed by the Open-Meteo geocoding and forecast APIs.

use std::sync::Arc;

use reqwest::{Client, Url};

use crate::mcp::capability::Capability;

pub mod distance;
pub mod geocoding;
pub mod upstream;
pub mod weather;

use distance::DistanceBetweenTownsTool;
use geocoding::GeocodingClient;
use weather::GetWeatherTool;

/// Fixed base URLs of the external services the tools call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    pub geocoding: Url,
    pub weather: Url,
}

/// Tools in advertisement order. All of them share one HTTP connection pool.
pub fn build_tools(http: Client, endpoints: &UpstreamEndpoints) -> Vec<Arc<dyn Capability>> {
    let geocoding = GeocodingClient::new(http.clone(), endpoints.geocoding.clone());

    vec![
        Arc::new(GetWeatherTool::new(
            geocoding.clone(),
            http,
            endpoints.weather.clone(),
        )),
        Arc::new(DistanceBetweenTownsTool::new(geocoding)),
    ]
}
