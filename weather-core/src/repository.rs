use anyhow::Context;
use std::sync::Arc;

use crate::{
    Config,
    client::{OpenWeatherClient, WeatherClient},
    error::WeatherError,
    history::{HistoryStore, SqliteHistoryStore},
    model::{HistoryRecord, WeatherSnapshot},
};

/// Joins the remote client and the local store. Store calls are moved onto
/// tokio's blocking pool so callers never block on disk I/O.
#[derive(Clone)]
pub struct WeatherRepository {
    client: Arc<dyn WeatherClient>,
    store: Arc<dyn HistoryStore>,
}

impl WeatherRepository {
    pub fn new(client: Arc<dyn WeatherClient>, store: Arc<dyn HistoryStore>) -> Self {
        Self { client, store }
    }

    pub async fn get_weather(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.client.fetch(city).await
    }

    pub async fn save_history(&self, record: HistoryRecord) -> Result<(), WeatherError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.append(&record)).await?
    }

    pub async fn get_history(&self) -> Result<Vec<HistoryRecord>, WeatherError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.list_all()).await?
    }
}

impl std::fmt::Debug for WeatherRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherRepository").field("client", &self.client).finish_non_exhaustive()
    }
}

/// Wire the OpenWeather client and the SQLite history store from config.
pub fn repository_from_config(config: &Config) -> anyhow::Result<WeatherRepository> {
    let api_key = config.resolved_api_key()?;
    let client = OpenWeatherClient::new(api_key, config.base_url.clone());

    let path = config.history_db_path()?;
    let store = SqliteHistoryStore::open(&path)
        .with_context(|| format!("Failed to open history database: {}", path.display()))?;

    Ok(WeatherRepository::new(Arc::new(client), Arc::new(store)))
}

/// Open only the history store, for reading without an API key.
pub fn history_from_config(config: &Config) -> anyhow::Result<SqliteHistoryStore> {
    let path = config.history_db_path()?;
    SqliteHistoryStore::open(&path)
        .with_context(|| format!("Failed to open history database: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct EchoClient;

    #[async_trait]
    impl WeatherClient for EchoClient {
        async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
            Ok(WeatherSnapshot {
                city_name: city.to_string(),
                temperature: 1.0,
                temp_max: 2.0,
                temp_min: 0.0,
                humidity: 50,
                pressure_sea_level: 1000.0,
                wind_speed: 1.5,
                sunrise: 0,
                sunset: 0,
                condition: "Mist".into(),
            })
        }
    }

    fn repository() -> WeatherRepository {
        let store = SqliteHistoryStore::open_in_memory().unwrap();
        WeatherRepository::new(Arc::new(EchoClient), Arc::new(store))
    }

    #[tokio::test]
    async fn get_weather_delegates_to_client() {
        let repo = repository();
        let snapshot = repo.get_weather("Oslo").await.unwrap();
        assert_eq!(snapshot.city_name, "Oslo");
    }

    #[tokio::test]
    async fn saved_history_is_listed() {
        let repo = repository();
        let record = HistoryRecord {
            city_name: "Oslo".into(),
            temperature: "1".into(),
            date: "01 January 2025".into(),
            condition: "Mist".into(),
        };

        repo.save_history(record.clone()).await.unwrap();

        assert_eq!(repo.get_history().await.unwrap(), vec![record]);
    }

    #[test]
    fn repository_from_config_errors_when_missing_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            history_path: Some(dir.path().join("history.sqlite3")),
            ..Config::default()
        };

        // Only meaningful when the override variable is not set in the test environment.
        if std::env::var(crate::config::API_KEY_ENV).is_err() {
            let err = repository_from_config(&cfg).unwrap_err();
            assert!(err.to_string().contains("No API key configured"));
        }
    }

    #[test]
    fn repository_from_config_opens_history_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history.sqlite3");
        let cfg = Config {
            api_key: Some("KEY".into()),
            history_path: Some(path.clone()),
            ..Config::default()
        };

        assert!(repository_from_config(&cfg).is_ok());
        assert!(path.exists());
        assert!(history_from_config(&cfg).unwrap().list_all().unwrap().is_empty());
    }
}
