use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::{UNKNOWN_CONDITION, WeatherSnapshot},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";

/// Unit system sent with every request.
const UNITS: &str = "metric";

#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    /// Fetch current weather for a free-text place name. The name is
    /// forwarded as-is.
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self { api_key, base_url, http: Client::new() }
    }

    fn endpoint(&self) -> String {
        format!("{}weather", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_max: f64,
    temp_min: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    sys: OwSys,
    wind: OwWind,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let condition = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| w.main)
            .unwrap_or_else(|| UNKNOWN_CONDITION.to_string());

        WeatherSnapshot {
            city_name: parsed.name,
            temperature: parsed.main.temp,
            temp_max: parsed.main.temp_max,
            temp_min: parsed.main.temp_min,
            humidity: parsed.main.humidity,
            pressure_sea_level: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            condition,
        }
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let url = self.endpoint();
        debug!(%url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .await
            .map_err(|e| WeatherError::Connectivity(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| WeatherError::Connectivity(e.to_string()))?;

        if !status.is_success() {
            return Err(WeatherError::Status { code: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Decode(e.to_string()))?;

        Ok(parsed.into())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
