//! Core library for the `weather` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the SQLite-backed lookup history
//! - Theme selection and display mapping for a lookup
//! - [`WeatherController`], which drives a lookup from fetch to display to history
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod history;
pub mod model;
pub mod repository;
pub mod theme;

pub use client::{OpenWeatherClient, WeatherClient};
pub use config::{Config, ErrorPolicy};
pub use controller::{FetchOutcome, Phase, ViewState, WeatherController};
pub use display::DisplayFields;
pub use error::WeatherError;
pub use history::{HistoryStore, SqliteHistoryStore};
pub use model::{HistoryRecord, WeatherSnapshot};
pub use repository::{WeatherRepository, history_from_config, repository_from_config};
pub use theme::Theme;
