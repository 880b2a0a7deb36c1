//! `Distance_between_towns`: great-circle distance between two geocoded towns

use async_trait::async_trait;
use rust_mcp_sdk::{macros, schema::Tool};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::geocoding::{Coordinates, GeocodingClient};
use crate::errors::AppError;
use crate::mcp::capability::{non_blank, parse_arguments, text_result, Capability};
use crate::mcp::rpc::JsonObject;

pub const DISTANCE_TOOL: &str = "Distance_between_towns";
const EARTH_RADIUS_KM: f64 = 6371.0;

#[macros::mcp_tool(
    name = "Distance_between_towns",
    description = "Get the distance in km between 2 towns."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DistanceArguments {
    /// City name of town 1 or its zip code
    pub town_1: String,
    /// City name of town 2 or its zip code
    pub town_2: String,
}

pub struct DistanceBetweenTownsTool {
    geocoding: GeocodingClient,
}

impl DistanceBetweenTownsTool {
    pub fn new(geocoding: GeocodingClient) -> Self {
        Self { geocoding }
    }
}

/// Haversine distance, rounded to whole kilometres.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> i64 {
    let latitude_delta = (to.latitude - from.latitude).to_radians();
    let longitude_delta = (to.longitude - from.longitude).to_radians();

    let a = (latitude_delta / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (longitude_delta / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    (EARTH_RADIUS_KM * c).round() as i64
}

#[async_trait]
impl Capability for DistanceBetweenTownsTool {
    fn definition(&self) -> Tool {
        Tool {
            title: Some("Get the distance between 2 towns".to_string()),
            ..DistanceArguments::tool()
        }
    }

    async fn handle(&self, arguments: JsonObject) -> Result<JsonObject, AppError> {
        let arguments: DistanceArguments = parse_arguments(arguments)?;
        let town_1 = non_blank("town_1", &arguments.town_1)?;
        let town_2 = non_blank("town_2", &arguments.town_2)?;

        let from = self.geocoding.locate(town_1).await?;
        let to = self.geocoding.locate(town_2).await?;
        let distance = haversine_km(from, to);

        text_result(json!({ "distance": format!("{distance} km") }).to_string())
    }
}
