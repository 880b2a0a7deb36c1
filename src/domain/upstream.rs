//! Outbound HTTP plumbing shared by the bundled tools

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;

/// Issues a GET against a fixed service URL and decodes the JSON body.
///
/// Transport failures and non-2xx answers are upstream failures; an undecodable body
/// is a malformed response.
pub async fn get_json<Q>(http: &Client, base_url: &Url, query: &Q) -> Result<Value, AppError>
where
    Q: Serialize + ?Sized,
{
    let response = http
        .get(base_url.clone())
        .query(query)
        .send()
        .await
        .map_err(|err| AppError::upstream(format!("request to {base_url} failed: {err}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::upstream(format!(
            "{base_url} answered with HTTP {status}"
        )));
    }

    response.json::<Value>().await.map_err(|err| {
        AppError::malformed_response(format!("{base_url} returned an invalid JSON body: {err}"))
    })
}
