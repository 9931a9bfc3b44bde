use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::{HistoryRecord, WeatherSnapshot};

pub const DATE_FORMAT: &str = "%d %B %Y";
const DAY_FORMAT: &str = "%A";
const CLOCK_FORMAT: &str = "%H:%M";

/// Every snapshot field rendered as the text shown on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFields {
    pub city: String,
    pub temperature: String,
    pub temp_max: String,
    pub temp_min: String,
    pub condition: String,
    pub humidity: String,
    pub sea_level: String,
    pub wind_speed: String,
    pub sunrise: String,
    pub sunset: String,
    pub day: String,
    pub date: String,
}

impl DisplayFields {
    /// `now` supplies both the timezone for sunrise/sunset and the day/date lines.
    pub fn from_snapshot<Tz>(snapshot: &WeatherSnapshot, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let tz = now.timezone();

        Self {
            city: snapshot.city_name.clone(),
            temperature: format_number(snapshot.temperature),
            temp_max: format_number(snapshot.temp_max),
            temp_min: format_number(snapshot.temp_min),
            condition: snapshot.condition.clone(),
            humidity: format!("{} %", snapshot.humidity),
            sea_level: snapshot.pressure_sea_level.to_string(),
            wind_speed: format_number(snapshot.wind_speed),
            sunrise: format_clock(snapshot.sunrise, &tz),
            sunset: format_clock(snapshot.sunset, &tz),
            day: now.format(DAY_FORMAT).to_string(),
            date: format_date(now),
        }
    }
}

/// Decimal text that always keeps a fractional part: `25.0` stays `"25.0"`.
pub fn format_number(value: f64) -> String {
    format!("{value:?}")
}

/// Wall-clock `HH:MM` for an epoch timestamp in the given timezone.
/// Out-of-range timestamps render as `--:--`.
pub fn format_clock<Tz>(epoch_secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(epoch_secs, 0) {
        Some(utc) => utc.with_timezone(tz).format(CLOCK_FORMAT).to_string(),
        None => "--:--".to_string(),
    }
}

pub fn format_date<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format(DATE_FORMAT).to_string()
}

/// History entry for a successful lookup. `city` is the query as typed, not
/// the name echoed back by the service.
pub fn history_record<Tz>(city: &str, snapshot: &WeatherSnapshot, now: &DateTime<Tz>) -> HistoryRecord
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    HistoryRecord {
        city_name: city.to_string(),
        temperature: format_number(snapshot.temperature),
        date: format_date(now),
        condition: snapshot.condition.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city_name: "Indore".into(),
            temperature: 25.3,
            temp_max: 27.0,
            temp_min: 23.5,
            humidity: 40,
            pressure_sea_level: 1012.0,
            wind_speed: 3.6,
            sunrise: 1_700_000_000,
            sunset: 1_700_040_000,
            condition: "Clear".into(),
        }
    }

    #[test]
    fn clock_is_deterministic_per_timezone() {
        assert_eq!(format_clock(1_700_000_000, &Utc), "22:13");

        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(format_clock(1_700_000_000, &ist), "03:43");
    }

    #[test]
    fn out_of_range_timestamp_renders_placeholder() {
        assert_eq!(format_clock(i64::MAX, &Utc), "--:--");
    }

    #[test]
    fn snapshot_fields_map_to_strings() {
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 9, 30, 0).unwrap();
        let fields = DisplayFields::from_snapshot(&snapshot(), &now);

        assert_eq!(fields.city, "Indore");
        assert_eq!(fields.temperature, "25.3");
        assert_eq!(fields.temp_max, "27.0");
        assert_eq!(fields.temp_min, "23.5");
        assert_eq!(fields.humidity, "40 %");
        assert_eq!(fields.sea_level, "1012");
        assert_eq!(fields.wind_speed, "3.6");
        assert_eq!(fields.sunrise, "22:13");
        assert_eq!(fields.sunset, "09:20");
        assert_eq!(fields.day, "Tuesday");
        assert_eq!(fields.date, "14 November 2023");
    }

    #[test]
    fn whole_numbers_keep_one_decimal() {
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 9, 30, 0).unwrap();
        let mut snap = snapshot();
        snap.temperature = 25.0;
        snap.wind_speed = 3.0;

        let fields = DisplayFields::from_snapshot(&snap, &now);
        assert_eq!(fields.temperature, "25.0");
        assert_eq!(fields.wind_speed, "3.0");
        assert_eq!(history_record("Indore", &snap, &now).temperature, "25.0");

        assert_eq!(format_number(-2.5), "-2.5");
        assert_eq!(format_number(0.0), "0.0");
    }

    #[test]
    fn history_record_uses_query_and_mapping_day() {
        let now = Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap();
        let mut snap = snapshot();
        snap.city_name = "Indore, IN".into();

        let record = history_record("indore", &snap, &now);

        assert_eq!(record.city_name, "indore");
        assert_eq!(record.temperature, "25.3");
        assert_eq!(record.date, "03 February 2024");
        assert_eq!(record.condition, "Clear");
    }
}
