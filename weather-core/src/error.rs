use thiserror::Error;

/// Failures surfaced by the weather client and the history store.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The weather endpoint answered with a non-success HTTP status.
    #[error("weather request failed with status {code}: {body}")]
    Status { code: u16, body: String },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("could not reach weather service: {0}")]
    Connectivity(String),

    /// A success response whose body did not match the expected JSON shape.
    #[error("unexpected weather response: {0}")]
    Decode(String),

    /// Reading or writing the local history failed.
    #[error("history storage failed: {0}")]
    Persistence(String),
}

impl WeatherError {
    /// HTTP status code, for status failures only.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            WeatherError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for WeatherError {
    fn from(err: rusqlite::Error) -> Self {
        WeatherError::Persistence(err.to_string())
    }
}

impl From<tokio::task::JoinError> for WeatherError {
    fn from(err: tokio::task::JoinError) -> Self {
        WeatherError::Persistence(format!("background task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_contains_code() {
        let err = WeatherError::Status { code: 404, body: "city not found".into() };
        assert!(err.to_string().contains("404"));
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn connectivity_has_no_status_code() {
        let err = WeatherError::Connectivity("no route to host".into());
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().contains("no route to host"));
    }
}
