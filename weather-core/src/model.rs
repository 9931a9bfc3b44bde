use serde::{Deserialize, Serialize};

/// Condition label used when the response carries no `weather` entries.
pub const UNKNOWN_CONDITION: &str = "unknown";

/// One point-in-time weather reading for a city, as returned by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub temperature: f64,
    pub temp_max: f64,
    pub temp_min: f64,
    pub humidity: u8,
    pub pressure_sea_level: f64,
    pub wind_speed: f64,
    pub sunrise: i64,
    pub sunset: i64,
    pub condition: String,
}

/// A persisted copy of a snapshot's key fields plus the day it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub city_name: String,
    pub temperature: String,
    pub date: String,
    pub condition: String,
}
