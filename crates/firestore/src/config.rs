//! Connection settings for one Firestore database

use std::time::Duration;

/// Production REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Database id used when none is configured
pub const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    /// REST root including the API version, without trailing slash
    pub base_url: String,
    /// Bearer token sent with every request
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Point at a local emulator, e.g. `localhost:8080`
    ///
    /// The emulator accepts the `owner` token as full admin access.
    pub fn emulator(mut self, host: &str) -> Self {
        let host = host.trim_end_matches('/');
        self.base_url = if host.starts_with("http://") || host.starts_with("https://") {
            format!("{host}/v1")
        } else {
            format!("http://{host}/v1")
        };
        if self.access_token.is_none() {
            self.access_token = Some("owner".to_string());
        }
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `projects/{project}/databases/{database}/documents`
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }

    /// Full resource name of a document
    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root(), collection, id)
    }

    /// URL of a resource name
    pub fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_names() {
        let config = FirestoreConfig::new("stocks-app");
        assert_eq!(
            config.document_name("stocks", "abc"),
            "projects/stocks-app/databases/(default)/documents/stocks/abc"
        );
        assert_eq!(
            config.url(&config.documents_root()),
            "https://firestore.googleapis.com/v1/projects/stocks-app/databases/(default)/documents"
        );
    }

    #[test]
    fn test_emulator_host() {
        let config = FirestoreConfig::new("demo").emulator("localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.access_token.as_deref(), Some("owner"));

        let config = FirestoreConfig::new("demo")
            .with_access_token("secret")
            .emulator("http://127.0.0.1:9000/");
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
    }
}
