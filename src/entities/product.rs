//! Product listing record

use crate::core::{Entity, FieldValue, ValidationError};
use crate::entities::millis_to_datetime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A product listing as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub price: f64,

    pub category: String,

    #[serde(default)]
    pub subcategory: String,

    #[serde(default)]
    pub sizes: Vec<String>,

    /// Flagged as trending on the storefront
    #[serde(default)]
    pub trending: bool,

    /// Image URLs
    #[serde(default)]
    pub image: Vec<String>,

    /// Creation time in milliseconds since the epoch
    #[serde(default)]
    pub date: i64,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            subcategory: String::new(),
            sizes: Vec::new(),
            trending: false,
            image: Vec::new(),
            date: 0,
        }
    }
}

/// Edits submitted from the product list
///
/// Unset fields are left untouched. Name, category and price must be set
/// before the edit is sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductChanges {
    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[validate(required, length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,

    #[validate(required, range(exclusive_min = 0.0))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trending: Option<bool>,
}

impl ProductChanges {
    /// Reject edits with a missing or out-of-range required field
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map_err(|e| ValidationError::InvalidField {
            field: e
                .field_errors()
                .keys()
                .next()
                .map(|k| k.to_string())
                .unwrap_or_default(),
            message: e.to_string(),
        })
    }

    /// Shallow-merge the set fields into `product`
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(subcategory) = &self.subcategory {
            product.subcategory = subcategory.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(trending) = self.trending {
            product.trending = trending;
        }
    }
}

/// Start an edit from the product's current values
impl From<&Product> for ProductChanges {
    fn from(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            description: Some(product.description.clone()),
            category: Some(product.category.clone()),
            subcategory: Some(product.subcategory.clone()),
            price: Some(product.price),
            trending: Some(product.trending),
        }
    }
}

impl Entity for Product {
    fn resource_label() -> &'static str {
        "Product"
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "_id" | "id" => Some(FieldValue::from(self.id.as_str())),
            "name" => Some(FieldValue::from(self.name.as_str())),
            "description" => Some(FieldValue::from(self.description.as_str())),
            "price" => Some(FieldValue::Float(self.price)),
            "category" => Some(FieldValue::from(self.category.as_str())),
            "subcategory" => Some(FieldValue::from(self.subcategory.as_str())),
            "trending" => Some(FieldValue::Boolean(self.trending)),
            "date" => Some(
                millis_to_datetime(self.date)
                    .map(FieldValue::DateTime)
                    .unwrap_or(FieldValue::Null),
            ),
            _ => None,
        }
    }
}
