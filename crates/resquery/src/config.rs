//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::pagination::DEFAULT_LIMIT;

/// Process-wide list settings, read once and passed to the parser.
///
/// ```
/// use resquery::ListConfig;
///
/// let config: ListConfig = serde_json::from_str(r#"{"default_limit": 25}"#).unwrap();
/// assert_eq!(config.default_limit(), 25);
/// assert_eq!(ListConfig::default().default_limit(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    default_limit: usize,
}

impl ListConfig {
    /// Creates a config with the given page size fallback.
    pub fn new(default_limit: usize) -> Self {
        ListConfig { default_limit }
    }

    /// Page size used when a request gives no usable limit.
    ///
    /// A zero value falls back to [`DEFAULT_LIMIT`].
    pub fn default_limit(&self) -> usize {
        if self.default_limit == 0 {
            DEFAULT_LIMIT
        } else {
            self.default_limit
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig::new(DEFAULT_LIMIT)
    }
}
