//! Derived view pipeline: text filter → categorical filter → sort → paginate
//!
//! [`render`] is a pure function of a base collection and a [`ViewState`].
//! The stage order is fixed: both filters shrink the candidate set before
//! sorting and slicing, so page counts always describe the filtered set.
//!
//! Every render walks the whole collection (O(n log n) for the sort). That
//! is fine for the hundreds of rows a dashboard list holds; it is not meant
//! for collections in the millions.

use crate::config::ViewConfig;
use crate::core::query::{PaginationMeta, SortDirection, SortSpec, ViewPage, ViewState};
use crate::core::{Entity, FieldValue};
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

/// Extra searchable text derived from a record (e.g., resolved reference names)
pub type ComputedSearch<T> = Arc<dyn Fn(&T) -> Vec<String> + Send + Sync>;

/// Which fields a view searches and filters on
pub struct ViewSpec<T> {
    search_fields: Vec<String>,
    category_field: Option<String>,
    computed_search: Option<ComputedSearch<T>>,
}

impl<T> Clone for ViewSpec<T> {
    fn clone(&self) -> Self {
        Self {
            search_fields: self.search_fields.clone(),
            category_field: self.category_field.clone(),
            computed_search: self.computed_search.clone(),
        }
    }
}

impl<T> fmt::Debug for ViewSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewSpec")
            .field("search_fields", &self.search_fields)
            .field("category_field", &self.category_field)
            .field("computed_search", &self.computed_search.is_some())
            .finish()
    }
}

impl<T> ViewSpec<T> {
    pub fn new<I, S>(search_fields: I, category_field: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            category_field: category_field.map(str::to_string),
            computed_search: None,
        }
    }

    /// Build a spec from a view's configuration
    pub fn from_config(config: &ViewConfig) -> Self {
        Self::new(
            config.search_fields.iter().cloned(),
            config.category_field.as_deref(),
        )
    }

    /// Also match the search term against text computed from each record
    pub fn with_computed_search<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Vec<String> + Send + Sync + 'static,
    {
        self.computed_search = Some(Arc::new(f));
        self
    }

    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    pub fn category_field(&self) -> Option<&str> {
        self.category_field.as_deref()
    }
}

/// Run the full pipeline and return the requested page
pub fn render<T: Entity>(
    collection: &[T],
    state: &ViewState,
    spec: &ViewSpec<T>,
) -> ViewPage<T> {
    let candidates: Vec<&T> = collection.iter().collect();

    let candidates = filter_text(candidates, &state.search, spec);
    let candidates = filter_category(candidates, state.active_filter(), spec);
    let candidates = sort(candidates, state.sort.as_ref());
    let page = paginate(&candidates, state.page(), state.page_size());

    tracing::debug!(
        resource = T::resource_label(),
        base = collection.len(),
        matched = page.pagination.total,
        page = page.pagination.page,
        "Rendered view"
    );

    page
}

/// Case-insensitive substring match against the searchable fields
///
/// An empty term keeps every item.
pub fn filter_text<'a, T: Entity>(
    items: Vec<&'a T>,
    term: &str,
    spec: &ViewSpec<T>,
) -> Vec<&'a T> {
    if term.is_empty() {
        return items;
    }
    let needle = term.to_lowercase();

    items
        .into_iter()
        .filter(|item| matches_text(*item, &needle, spec))
        .collect()
}

fn matches_text<T: Entity>(item: &T, needle: &str, spec: &ViewSpec<T>) -> bool {
    let field_match = spec.search_fields.iter().any(|field| {
        item.field_value(field)
            .and_then(|value| value.search_text())
            .is_some_and(|text| text.contains(needle))
    });

    field_match
        || spec.computed_search.as_ref().is_some_and(|computed| {
            computed(item)
                .iter()
                .any(|text| text.to_lowercase().contains(needle))
        })
}

/// Exact match of the category field against the selected value
///
/// `None` keeps every item, as does a spec without a category field.
pub fn filter_category<'a, T: Entity>(
    items: Vec<&'a T>,
    selected: Option<&str>,
    spec: &ViewSpec<T>,
) -> Vec<&'a T> {
    let (Some(selected), Some(field)) = (selected, spec.category_field.as_deref()) else {
        return items;
    };

    items
        .into_iter()
        .filter(|item| {
            item.field_value(field)
                .and_then(|value| value.match_text())
                .is_some_and(|text| text == selected)
        })
        .collect()
}

/// Distinct values of `field` in first-seen order
///
/// These are the options offered by the categorical filter. Items without
/// a value for the field are skipped.
pub fn distinct_values<T: Entity>(collection: &[T], field: &str) -> Vec<String> {
    collection
        .iter()
        .filter_map(|item| item.field_value(field))
        .filter_map(|value| value.match_text())
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Stable sort by the selected field
///
/// Items with equal keys keep their input order in both directions.
/// Missing fields sort as null.
pub fn sort<'a, T: Entity>(items: Vec<&'a T>, spec: Option<&SortSpec>) -> Vec<&'a T> {
    let Some(spec) = spec else {
        return items;
    };

    let mut keyed: Vec<(FieldValue, &'a T)> = items
        .into_iter()
        .map(|item| (item.field_value(&spec.field).unwrap_or(FieldValue::Null), item))
        .collect();

    // slice::sort_by is stable; reversing the comparator keeps ties in place
    keyed.sort_by(|(a, _), (b, _)| match spec.direction {
        SortDirection::Asc => a.compare(b),
        SortDirection::Desc => b.compare(a),
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Slice one page out of the filtered, sorted items
///
/// A page past the end yields no items rather than an error.
pub fn paginate<T: Clone>(items: &[&T], page: usize, page_size: usize) -> ViewPage<T> {
    let pagination = PaginationMeta::new(page, page_size, items.len());

    let page_items = items
        .iter()
        .skip(pagination.offset())
        .take(pagination.limit)
        .map(|item| (*item).clone())
        .collect();

    ViewPage {
        items: page_items,
        pagination,
    }
}

/// Holds the live view state of one list and applies its update rules
///
/// Changing the search term or the categorical filter sends the view back
/// to the first page.
#[derive(Debug, Clone)]
pub struct ViewController<T> {
    spec: ViewSpec<T>,
    state: ViewState,
}

impl<T: Entity> ViewController<T> {
    pub fn new(spec: ViewSpec<T>, state: ViewState) -> Self {
        Self { spec, state }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn spec(&self) -> &ViewSpec<T> {
        &self.spec
    }

    /// Replace the search term, returning to page 1 if it changed
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.state.search {
            self.state.search = term;
            self.state.page = 1;
        }
    }

    /// Replace the categorical selector, returning to page 1 if it changed
    pub fn set_filter(&mut self, selected: Option<String>) {
        if selected != self.state.filter {
            self.state.filter = selected;
            self.state.page = 1;
        }
    }

    /// Sort by `field`; asking again for the current ascending field flips it
    pub fn request_sort(&mut self, field: &str) {
        let direction = match &self.state.sort {
            Some(current) if current.field == field && current.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        self.state.sort = Some(SortSpec::new(field, direction));
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.state.sort = sort;
    }

    /// Flip the direction of the current sort
    pub fn toggle_direction(&mut self) {
        if let Some(sort) = self.state.sort.as_mut() {
            sort.direction = sort.direction.toggled();
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.state.page = page.max(1);
    }

    /// Advance one page if the last render reported a next page
    pub fn next_page(&mut self, pagination: &PaginationMeta) {
        if pagination.has_next {
            self.state.page = pagination.page + 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.state.page = self.state.page.saturating_sub(1).max(1);
    }

    pub fn render(&self, collection: &[T]) -> ViewPage<T> {
        render(collection, &self.state, &self.spec)
    }
}
