//! `get_weather`: two-day temperature forecast for a named location

use async_trait::async_trait;
use reqwest::{Client, Url};
use rust_mcp_sdk::{macros, schema::Tool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::geocoding::{Coordinates, GeocodingClient};
use crate::domain::upstream::get_json;
use crate::errors::AppError;
use crate::mcp::capability::{non_blank, parse_arguments, text_result, Capability};
use crate::mcp::rpc::JsonObject;

pub const GET_WEATHER_TOOL: &str = "get_weather";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min";
const FORECAST_DAYS: &str = "2";

#[macros::mcp_tool(
    name = "get_weather",
    description = "Get current weather information for a location"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetWeatherArguments {
    /// City name or zip code
    pub location: String,
}

pub struct GetWeatherTool {
    geocoding: GeocodingClient,
    http: Client,
    forecast_url: Url,
}

impl GetWeatherTool {
    pub fn new(geocoding: GeocodingClient, http: Client, forecast_url: Url) -> Self {
        Self {
            geocoding,
            http,
            forecast_url,
        }
    }

    async fn forecast(&self, coordinates: Coordinates) -> Result<Value, AppError> {
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();
        let forecast = get_json(
            &self.http,
            &self.forecast_url,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("daily", DAILY_FIELDS),
                ("forecast_days", FORECAST_DAYS),
            ],
        )
        .await?;

        if !forecast.is_object() {
            return Err(AppError::malformed_response(
                "weather response is not a JSON object",
            ));
        }
        Ok(forecast)
    }
}

#[async_trait]
impl Capability for GetWeatherTool {
    fn definition(&self) -> Tool {
        Tool {
            title: Some("Get Weather".to_string()),
            ..GetWeatherArguments::tool()
        }
    }

    async fn handle(&self, arguments: JsonObject) -> Result<JsonObject, AppError> {
        let arguments: GetWeatherArguments = parse_arguments(arguments)?;
        let location = non_blank("location", &arguments.location)?;
        let coordinates = self.geocoding.locate(location).await?;
        let forecast = self.forecast(coordinates).await?;

        let text = serde_json::to_string(&forecast)
            .map_err(|err| AppError::internal(format!("failed to encode forecast: {err}")))?;
        text_result(text)
    }
}
