//! Handlers proxying the third-party air-quality and weather APIs.
//!
//! The upstream keys stay server-side: the browser only ever talks to
//! these endpoints. Responses are forwarded opaquely -- the exact
//! upstream schemas are not this backend's contract.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use breezy_core::geo::{haversine_km, nearest_point};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Upstream proxy timeout. Single attempt, no retry.
const PROXY_TIMEOUT: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// AQI
// ---------------------------------------------------------------------------

/// GET /api/aqi
///
/// Proxy the MOENV air-quality dataset with the server-side key.
pub async fn get_aqi(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let payload = fetch_aqi_dataset(&state).await?;
    Ok(Json(payload))
}

/// Query parameters for `GET /api/aqi/nearest`.
#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
}

/// GET /api/aqi/nearest?lat=..&lon=..
///
/// Return the monitoring-site record nearest to the given coordinates,
/// plus the great-circle distance to it.
pub async fn get_nearest_aqi(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> AppResult<Json<Value>> {
    let payload = fetch_aqi_dataset(&state).await?;

    let records = payload
        .get("records")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    // Keep only records with parseable coordinates, remembering their
    // position in the upstream list.
    let sited: Vec<(usize, (f64, f64))> = records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let lat = coordinate(record, "latitude")?;
            let lon = coordinate(record, "longitude")?;
            Some((i, (lat, lon)))
        })
        .collect();

    let points: Vec<(f64, f64)> = sited.iter().map(|(_, point)| *point).collect();
    let nearest = nearest_point(query.lat, query.lon, &points)
        .ok_or_else(|| AppError::Upstream("AQI dataset contained no usable sites".into()))?;

    let (record_index, (site_lat, site_lon)) = sited[nearest];
    let distance_km = haversine_km(query.lat, query.lon, site_lat, site_lon);

    Ok(Json(serde_json::json!({
        "site": records[record_index].clone(),
        "distanceKm": distance_km,
    })))
}

/// Fetch the full AQI dataset from the upstream with the server-side key.
async fn fetch_aqi_dataset(state: &AppState) -> AppResult<Value> {
    let api_key = state
        .config
        .upstream
        .aqi_api_key
        .as_deref()
        .ok_or_else(|| AppError::InternalError("AQI_API_KEY is not configured".into()))?;

    let response = state
        .http
        .get(&state.config.upstream.aqi_api_url)
        .query(&[("api_key", api_key), ("format", "json")])
        .timeout(PROXY_TIMEOUT)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to fetch AQI data: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "AQI upstream returned {}",
            response.status()
        )));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid AQI upstream payload: {e}")))
}

/// Parse a coordinate field that the upstream serves as either a string
/// or a number.
fn coordinate(record: &Value, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/weather`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuery {
    /// Optional CWA location filter (e.g. a county name).
    pub location_name: Option<String>,
}

/// GET /api/weather?locationName=..
///
/// Proxy the CWA 36-hour forecast dataset with the server-side key.
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> AppResult<Json<Value>> {
    let api_key = state
        .config
        .upstream
        .weather_api_key
        .as_deref()
        .ok_or_else(|| AppError::InternalError("WEATHER_API_KEY is not configured".into()))?;

    let mut params = vec![("Authorization", api_key.to_string())];
    if let Some(location) = query.location_name.filter(|l| !l.is_empty()) {
        params.push(("locationName", location));
    }

    let response = state
        .http
        .get(&state.config.upstream.weather_api_url)
        .query(&params)
        .timeout(PROXY_TIMEOUT)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to fetch weather data: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "Weather upstream returned {}",
            response.status()
        )));
    }

    let payload = response
        .json::<Value>()
        .await
        .map_err(|e| AppError::Upstream(format!("Invalid weather upstream payload: {e}")))?;
    Ok(Json(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_parses_strings_and_numbers() {
        let record = serde_json::json!({
            "latitude": "25.0330",
            "longitude": 121.5654,
            "sitename": "中山",
        });
        assert_eq!(coordinate(&record, "latitude"), Some(25.033));
        assert_eq!(coordinate(&record, "longitude"), Some(121.5654));
        assert_eq!(coordinate(&record, "sitename"), None);
        assert_eq!(coordinate(&record, "missing"), None);
    }

    #[test]
    fn coordinate_rejects_unparseable_strings() {
        let record = serde_json::json!({ "latitude": "n/a" });
        assert_eq!(coordinate(&record, "latitude"), None);
    }
}
