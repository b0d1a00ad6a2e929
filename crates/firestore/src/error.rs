use firestocks_ports::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {code} {status} - {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convert transport failures into the store port's error
impl From<RestError> for StoreError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Http(e) if e.is_connect() || e.is_timeout() => {
                StoreError::Connection(e.to_string())
            }
            RestError::Http(e) => StoreError::Request(e.to_string()),
            RestError::Api { code: 404, message, .. } => StoreError::NotFound(message),
            RestError::Api { code, message, .. } => StoreError::Rejected { code, message },
            RestError::Parse(msg) => StoreError::Deserialization(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_errors_map_to_store_errors() {
        let not_found = RestError::Api {
            code: 404,
            status: "NOT_FOUND".to_string(),
            message: "no such document".to_string(),
        };
        assert_eq!(
            StoreError::from(not_found),
            StoreError::NotFound("no such document".to_string())
        );

        let rejected = RestError::Api {
            code: 400,
            status: "INVALID_ARGUMENT".to_string(),
            message: "maximum 500 writes allowed per request".to_string(),
        };
        assert!(matches!(
            StoreError::from(rejected),
            StoreError::Rejected { code: 400, .. }
        ));
    }
}
