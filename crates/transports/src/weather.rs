//! Daily weather forecast lookup for call sheets.
//!
//! [`WeatherClient`] queries an Open-Meteo-style forecast API for one
//! location and date. The numeric weather code maps onto a fixed condition
//! table (`"Unknown"` for unrecognized codes), and missing or malformed
//! response fields degrade to defaults rather than failing the fetch.

use std::time::Duration;

use serde::Deserialize;

use crate::error::TransportError;

/// HTTP request timeout for a single forecast fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default forecast API base URL.
const DEFAULT_API_BASE: &str = "https://api.open-meteo.com";

// ---------------------------------------------------------------------------
// Condition code table
// ---------------------------------------------------------------------------

/// Map a WMO weather code to display text.
///
/// Unrecognized codes render as `"Unknown"`.
pub fn condition_from_code(code: i32) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mostly Clear",
        2 => "Partly Cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing Drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing Rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow Grains",
        80 | 81 | 82 => "Rain Showers",
        85 | 86 => "Snow Showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with Hail",
        _ => "Unknown",
    }
}

// ---------------------------------------------------------------------------
// WeatherReport
// ---------------------------------------------------------------------------

/// One day's forecast for a shoot location.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct WeatherReport {
    pub high_c: f64,
    pub low_c: f64,
    /// Display condition from the fixed code table.
    pub condition: String,
    pub humidity_pct: f64,
    pub wind_kph: f64,
    /// Local sunrise time as reported by the API (ISO 8601).
    pub sunrise: String,
    /// Local sunset time as reported by the API (ISO 8601).
    pub sunset: String,
}

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Daily block of the forecast response. Every field defaults so a missing
/// or malformed block degrades to zeros instead of aborting the fetch.
#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    weather_code: Vec<i32>,
    #[serde(default)]
    relative_humidity_2m_mean: Vec<f64>,
    #[serde(default)]
    wind_speed_10m_max: Vec<f64>,
    #[serde(default)]
    sunrise: Vec<String>,
    #[serde(default)]
    sunset: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: DailyBlock,
}

impl ForecastResponse {
    /// Flatten the first day of the response into a report, defaulting every
    /// absent field.
    fn into_report(self) -> WeatherReport {
        let daily = self.daily;
        WeatherReport {
            high_c: daily.temperature_2m_max.first().copied().unwrap_or(0.0),
            low_c: daily.temperature_2m_min.first().copied().unwrap_or(0.0),
            condition: condition_from_code(daily.weather_code.first().copied().unwrap_or(-1))
                .to_string(),
            humidity_pct: daily
                .relative_humidity_2m_mean
                .first()
                .copied()
                .unwrap_or(0.0),
            wind_kph: daily.wind_speed_10m_max.first().copied().unwrap_or(0.0),
            sunrise: daily.sunrise.first().cloned().unwrap_or_default(),
            sunset: daily.sunset.first().cloned().unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// WeatherClient
// ---------------------------------------------------------------------------

/// Forecast API client.
pub struct WeatherClient {
    client: reqwest::Client,
    api_base: String,
}

impl WeatherClient {
    /// Create a client against the public forecast API.
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Create a client against a specific base URL (for tests).
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    /// Fetch the forecast for one location and calendar date.
    pub async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        date: chrono::NaiveDate,
    ) -> Result<WeatherReport, TransportError> {
        let day = date.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(format!("{}/v1/forecast", self.api_base))
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", day.clone()),
                ("end_date", day),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,weather_code,\
                     relative_humidity_2m_mean,wind_speed_10m_max,sunrise,sunset"
                        .to_string(),
                ),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Api {
                service: "Weather",
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let forecast: ForecastResponse = response.json().await?;
        Ok(forecast.into_report())
    }
}

impl Default for WeatherClient {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
