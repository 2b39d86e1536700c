//! View state and pagination utilities

use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort key and direction
///
/// # Format
/// - `field:asc` or `field` (ascending)
/// - `field:desc` (descending)
///
/// `ascending` / `descending` are accepted as aliases.
///
/// # Example
/// ```
/// use storefront_admin::core::query::{SortDirection, SortSpec};
///
/// let sort: SortSpec = "price:desc".parse().unwrap();
/// assert_eq!(sort.field, "price");
/// assert_eq!(sort.direction, SortDirection::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

impl FromStr for SortSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ValidationError::InvalidSort {
            value: s.to_string(),
            message: message.to_string(),
        };

        let (field, direction) = match s.split_once(':') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_lowercase().as_str() {
                    "asc" | "ascending" => SortDirection::Asc,
                    "desc" | "descending" => SortDirection::Desc,
                    _ => return Err(invalid("direction must be 'asc' or 'desc'")),
                };
                (field.trim(), direction)
            }
            None => (s.trim(), SortDirection::Asc),
        };

        if field.is_empty() {
            return Err(invalid("field name is empty"));
        }

        Ok(Self::new(field, direction))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.field, dir)
    }
}

/// User-controlled parameters driving a list view
///
/// Every field is supplied from outside (search box, dropdowns, pager); none
/// of it is derived from the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Free-text search term (empty means no text filter)
    pub search: String,

    /// Selected categorical value (`None`, empty or "all" means no filter)
    pub filter: Option<String>,

    /// Sort key and direction (`None` keeps input order)
    pub sort: Option<SortSpec>,

    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: None,
            sort: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl ViewState {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get page size, ensuring minimum of 1
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Active categorical filter, if any
    pub fn active_filter(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case("all"))
    }

    /// Active search term, if any
    pub fn active_search(&self) -> Option<&str> {
        Some(self.search.as_str()).filter(|s| !s.is_empty())
    }
}

/// One page of a derived view
#[derive(Debug, Clone, Serialize)]
pub struct ViewPage<T> {
    /// Items on the requested page
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }

    /// Offset of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// 1-based index of the first item shown, 0 if the page is empty
    pub fn first_index(&self) -> usize {
        if self.offset() < self.total {
            self.offset() + 1
        } else {
            0
        }
    }

    /// 1-based index of the last item shown, 0 if the page is empty
    pub fn last_index(&self) -> usize {
        if self.offset() < self.total {
            self.offset().saturating_add(self.limit).min(self.total)
        } else {
            0
        }
    }
}
