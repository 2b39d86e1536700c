//! CSV export of list views

use crate::entities::Product;
use chrono::NaiveDate;

const PRODUCT_HEADER: [&str; 4] = ["Product ID", "Name", "Category", "Price"];

/// Render products as CSV in the order given
///
/// Pass the filtered and sorted view (not just the current page) to export
/// what the user is looking at.
pub fn products_csv(products: &[Product]) -> String {
    let mut lines = Vec::with_capacity(products.len() + 1);
    lines.push(csv_row(PRODUCT_HEADER.iter().map(|h| h.to_string())));

    for product in products {
        lines.push(csv_row([
            product.id.clone(),
            product.name.clone(),
            product.category.clone(),
            product.price.to_string(),
        ]));
    }

    lines.join("\n")
}

/// File name for an export made on `date`, e.g. `products-export-2024-05-20.csv`
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}-export-{}.csv", prefix, date.format("%Y-%m-%d"))
}

fn csv_row<I>(fields: I) -> String
where
    I: IntoIterator<Item = String>,
{
    fields
        .into_iter()
        .map(|field| escape(&field))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
