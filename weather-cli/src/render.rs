use weather_core::{DisplayFields, HistoryRecord, Theme};

/// Current weather block, as shown after a lookup.
pub fn weather(display: &DisplayFields, theme: Option<Theme>) -> String {
    let theme_line = match theme {
        Some(theme) => format!("{theme} ({}, {})", theme.animation(), theme.background()),
        None => "default".to_string(),
    };

    let rows = [
        ("Temperature", format!("{} °C", display.temperature)),
        ("Max / Min", format!("{} / {} °C", display.temp_max, display.temp_min)),
        ("Condition", display.condition.clone()),
        ("Humidity", display.humidity.clone()),
        ("Wind speed", format!("{} m/s", display.wind_speed)),
        ("Sea level", format!("{} hPa", display.sea_level)),
        ("Sunrise", display.sunrise.clone()),
        ("Sunset", display.sunset.clone()),
        ("Theme", theme_line),
    ];

    let mut out = format!("{}\n{}, {}\n\n", display.city, display.day, display.date);
    for (label, value) in rows {
        out.push_str(&format!("  {label:<12} {value}\n"));
    }
    out
}

/// History list, oldest first.
pub fn history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "No history yet.\n".to_string();
    }

    let city_width = records.iter().map(|r| r.city_name.chars().count()).max().unwrap_or(0).max(4);

    let mut out = String::new();
    for r in records {
        out.push_str(&format!(
            "{:<city_width$}  {:>6} °C  {:<12}  {}\n",
            r.city_name, r.temperature, r.condition, r.date
        ));
    }
    out
}
