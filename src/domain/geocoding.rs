//! Town name to coordinates, via the Open-Meteo geocoding API

use reqwest::{Client, Url};
use serde_json::Value;

use crate::domain::upstream::get_json;
use crate::errors::AppError;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const SEARCH_LANGUAGE: &str = "fr";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    base_url: Url,
}

impl GeocodingClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Best match for a town name or zip code.
    pub async fn locate(&self, town: &str) -> Result<Coordinates, AppError> {
        let body = get_json(
            &self.http,
            &self.base_url,
            &[("name", town), ("count", "1"), ("language", SEARCH_LANGUAGE)],
        )
        .await?;

        parse_first_result(&body, town)
    }
}

fn parse_first_result(body: &Value, town: &str) -> Result<Coordinates, AppError> {
    if !body.is_object() {
        return Err(AppError::malformed_response(
            "geocoding response is not a JSON object",
        ));
    }

    let first = match body.get("results") {
        None | Some(Value::Null) => None,
        Some(Value::Array(results)) => results.first(),
        Some(_) => {
            return Err(AppError::malformed_response(
                "geocoding \"results\" is not an array",
            ))
        }
    }
    .ok_or_else(|| AppError::not_found(format!("Town \"{town}\" not found")))?;

    let latitude = coordinate(first, "latitude", 90.0)?;
    let longitude = coordinate(first, "longitude", 180.0)?;
    Ok(Coordinates {
        latitude,
        longitude,
    })
}

fn coordinate(result: &Value, field: &str, bound: f64) -> Result<f64, AppError> {
    let value = result.get(field).and_then(Value::as_f64).ok_or_else(|| {
        AppError::malformed_response(format!("geocoding result has no numeric {field}"))
    })?;

    if !value.is_finite() || value.abs() > bound {
        return Err(AppError::malformed_response(format!(
            "geocoding {field} {value} is out of range"
        )));
    }
    Ok(value)
}
