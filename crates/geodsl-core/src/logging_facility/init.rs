//! Logging initialization

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output at debug level
    #[default]
    Development,
    /// JSON lines at info level
    Production,
    /// Bare registry; tests install their own capture layer
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber
///
/// Only the first call has any effect. Output goes to stderr so that stdout
/// stays reserved for evaluation results. `RUST_LOG` overrides the default
/// filter of the profile.
///
/// # Example
///
/// ```
/// use geodsl_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("geodsl=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("geodsl=info")),
                )
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_lowercase() {
        let p: Profile = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(p, Profile::Production);
        assert!(serde_json::from_str::<Profile>("\"verbose\"").is_err());
    }

    #[test]
    fn test_default_profile() {
        assert_eq!(Profile::default(), Profile::Development);
    }
}
