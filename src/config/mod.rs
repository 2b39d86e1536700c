//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::{SortSpec, ViewState};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Configuration of one list view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Fields matched by the search box
    pub search_fields: Vec<String>,

    /// Field used by the categorical dropdown
    #[serde(default)]
    pub category_field: Option<String>,

    /// Initial sort expression (e.g., "name:asc")
    #[serde(default)]
    pub default_sort: Option<String>,
}

impl ViewConfig {
    /// Initial view state for this view
    pub fn view_state(&self, page_size: usize) -> Result<ViewState, ConfigError> {
        let sort = self
            .default_sort
            .as_deref()
            .map(str::parse::<SortSpec>)
            .transpose()
            .map_err(|e| ConfigError::InvalidValue {
                field: "default_sort".to_string(),
                message: e.to_string(),
            })?;

        Ok(ViewState {
            sort,
            page_size,
            ..Default::default()
        })
    }

    /// Default product list view
    pub fn products() -> Self {
        Self {
            search_fields: vec!["name".to_string(), "category".to_string()],
            category_field: Some("category".to_string()),
            default_sort: Some("name:asc".to_string()),
        }
    }

    /// Default order list view
    pub fn orders() -> Self {
        Self {
            search_fields: vec!["_id".to_string(), "customer".to_string(), "city".to_string()],
            category_field: Some("status".to_string()),
            default_sort: Some("date:desc".to_string()),
        }
    }
}

/// Where and under which key the entity cache persists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Storage key (file stem for file-backed stores)
    #[serde(default = "default_cache_key")]
    pub key: String,

    /// Directory for file-backed stores; `None` keeps the cache in memory
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_cache_key() -> String {
    "cachedProducts".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: default_cache_key(),
            directory: None,
        }
    }
}

impl CacheConfig {
    /// Path of the cache file, if a directory is configured
    pub fn file_path(&self) -> Option<std::path::PathBuf> {
        self.directory
            .as_ref()
            .map(|dir| std::path::Path::new(dir).join(format!("{}.json", self.key)))
    }
}

/// Complete configuration for the dashboard core
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    /// Rows per page in every list view
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: usize,

    /// Trailing id characters shown for unresolved references
    #[serde(default = "default_fallback_suffix_len")]
    #[validate(range(min = 1))]
    pub fallback_suffix_len: usize,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default = "ViewConfig::products")]
    pub product_view: ViewConfig,

    #[serde(default = "ViewConfig::orders")]
    pub order_view: ViewConfig,
}

fn default_page_size() -> usize {
    10
}

fn default_fallback_suffix_len() -> usize {
    6
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            fallback_suffix_len: default_fallback_suffix_len(),
            cache: CacheConfig::default(),
            product_view: ViewConfig::products(),
            order_view: ViewConfig::orders(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: format!("{}: {}", path, e),
        })?;
        Self::parse(&content, Some(path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<&str>) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: file.map(str::to_string),
            message: e.to_string(),
        })?;

        config.validate().map_err(|e| ConfigError::InvalidValue {
            field: e
                .field_errors()
                .keys()
                .next()
                .map(|k| k.to_string())
                .unwrap_or_default(),
            message: e.to_string(),
        })?;

        // Surface bad sort expressions at load time
        config.product_view.view_state(config.page_size)?;
        config.order_view.view_state(config.page_size)?;

        Ok(config)
    }

    /// Initial state of the product list
    pub fn product_view_state(&self) -> Result<ViewState, ConfigError> {
        self.product_view.view_state(self.page_size)
    }

    /// Initial state of the order list
    pub fn order_view_state(&self) -> Result<ViewState, ConfigError> {
        self.order_view.view_state(self.page_size)
    }
}
