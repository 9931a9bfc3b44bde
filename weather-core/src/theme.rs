use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual treatment selected from a condition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl Theme {
    /// Exact, case-sensitive match. `None` means "keep whatever theme is showing".
    pub fn for_condition(label: &str) -> Option<Self> {
        match label {
            "Clear Sky" | "Sunny" | "Clear" => Some(Theme::Sunny),
            "Partly Clouds" | "Clouds" | "Overcast" | "Mist" | "Foggy" | "Haze" => {
                Some(Theme::Cloudy)
            }
            "Light Rain" | "Drizzle" | "Moderate Rain" | "Showers" | "Heavy Rain" => {
                Some(Theme::Rainy)
            }
            "Light Snow" | "Moderate Snow" | "Blizzard" | "Heavy Snow" => Some(Theme::Snowy),
            _ => None,
        }
    }

    pub fn animation(&self) -> &'static str {
        match self {
            Theme::Sunny => "sun",
            Theme::Cloudy => "cloud",
            Theme::Rainy => "rain",
            Theme::Snowy => "snow",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Theme::Sunny => "background_sunny",
            Theme::Cloudy => "background_cloudy",
            Theme::Rainy => "background_rainy",
            Theme::Snowy => "background_snowy",
        }
    }

    pub const fn all() -> &'static [Theme] {
        &[Theme::Sunny, Theme::Cloudy, Theme::Rainy, Theme::Snowy]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Theme::Sunny => "sunny",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Snowy => "snowy",
        };
        f.write_str(name)
    }
}

/// Apply a condition label to the theme currently shown.
pub fn next_theme(current: Option<Theme>, label: &str) -> Option<Theme> {
    Theme::for_condition(label).or(current)
}
