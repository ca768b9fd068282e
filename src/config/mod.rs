//! Resolver options loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default page size used when the caller omits `limit`
pub const DEFAULT_LIMIT: u64 = 1000;

/// Options for the `limit` argument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitOptions {
    /// Value used when the caller omits `limit` (defaults to 1000)
    #[serde(default)]
    pub default_value: Option<u64>,

    /// Upper bound applied to any requested limit
    #[serde(default)]
    pub max: Option<u64>,
}

impl LimitOptions {
    /// Default value, never above the configured maximum
    pub fn effective_default(&self) -> u64 {
        let default = self.default_value.unwrap_or(DEFAULT_LIMIT);
        match self.max {
            Some(max) => default.min(max),
            None => default,
        }
    }
}

/// Options for the `sort` argument
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortOptions {
    /// Name of the generated sort enum; derived from the output type when unset
    #[serde(default)]
    pub sort_type_name: Option<String>,

    /// Enum value used when the caller omits `sort` (defaults to key ascending)
    #[serde(default)]
    pub default_value: Option<String>,
}

/// Options accepted by a resolver factory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverOptions {
    #[serde(default)]
    pub limit: Option<LimitOptions>,

    #[serde(default)]
    pub sort: Option<SortOptions>,
}

impl ResolverOptions {
    /// Load options from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load options from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            file: None,
            message: e.to_string(),
        })
    }

    pub fn with_limit(mut self, limit: LimitOptions) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, sort: SortOptions) -> Self {
        self.sort = Some(sort);
        self
    }
}
