//! Error types shared across the launcher.
//!
//! Every kind here is terminal at the UI boundary: it ends up as an alert,
//! an inline card, or an activity-strip line. Nothing is retried automatically
//! except the offline cache's revalidation.

use thiserror::Error;

use crate::system::os::PlatformTag;

/// Failure to resolve or carry out an install/open action.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no action available for this app on {platform}")]
    NoActionAvailable { platform: PlatformTag },

    #[error("failed to open {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub fn user_message(&self) -> String {
        match self {
            LaunchError::NoActionAvailable { platform } => format!(
                "This app has no install or open action for {}.",
                platform.label()
            ),
            LaunchError::Navigation { url, source } => {
                format!("Could not hand {url} to the system opener:\n\n{source}")
            }
        }
    }
}

/// Failure inside the offline cache or the transport beneath it.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache record is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("precache failed for {url}: {source}")]
    Precache {
        url: String,
        #[source]
        source: Box<CacheError>,
    },
}

/// Loading the catalog document failed; shown as an inline card.
#[derive(Debug, Error)]
pub enum CatalogFetchError {
    #[error("could not fetch catalog: {0}")]
    Fetch(#[from] CacheError),

    #[error("catalog is not a valid app list: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogFetchError {
    pub fn user_message(&self) -> String {
        match self {
            CatalogFetchError::Fetch(_) => {
                "Error loading the app catalog. Press r to retry.".to_string()
            }
            CatalogFetchError::Parse(_) => {
                "The app catalog is malformed. Press r to retry.".to_string()
            }
        }
    }
}

/// Identity provider failure. Carries the provider's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct AuthError(pub String);

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_action_message_names_platform() {
        let err = LaunchError::NoActionAvailable {
            platform: PlatformTag::Ios,
        };
        assert!(err.user_message().contains("iOS"));
        assert!(err.to_string().contains("ios"));
    }

    #[test]
    fn test_auth_error_keeps_provider_text() {
        let err = AuthError::new("wrong password");
        assert_eq!(err.to_string(), "wrong password");
    }

    #[test]
    fn test_catalog_error_wraps_cache_error() {
        let err: CatalogFetchError = CacheError::Status {
            url: "apps.json".into(),
            status: 404,
        }
        .into();
        assert!(err.to_string().contains("404"));
        assert!(err.user_message().contains("retry"));
    }
}
