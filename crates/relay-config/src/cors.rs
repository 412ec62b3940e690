use std::time::Duration;

use serde::Deserialize;

/// CORS configuration
///
/// Methods and headers are always permissive; only origins, credentials
/// and preflight caching are configurable.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins, `"*"` or a list
    #[serde(default)]
    pub origins: Origins,
    /// Allow credentials
    #[serde(default)]
    pub credentials: bool,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

/// Allowed origins
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOrigins")]
pub enum Origins {
    /// Any origin
    #[default]
    Any,
    /// Explicit list of origins
    List(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOrigins {
    One(String),
    Many(Vec<String>),
}

impl From<RawOrigins> for Origins {
    fn from(raw: RawOrigins) -> Self {
        let values = match raw {
            RawOrigins::One(value) => vec![value],
            RawOrigins::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Self::Any
        } else {
            Self::List(values)
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}
