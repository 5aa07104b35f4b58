use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A product row as stored in the storefront `products` collection.
///
/// Field names match the remote table's column names, so the record can be
/// posted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Original price shown struck through next to `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub inventory_count: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A data-quality problem found in a [`ProductRecord`].
///
/// Issues never block a submission; the remote table has the final word.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordIssue {
    #[error("name is blank")]
    BlankName,
    #[error("price {0} is negative")]
    NegativePrice(f64),
    #[error("compare price {compare} is below price {price}")]
    CompareBelowPrice { price: f64, compare: f64 },
    #[error("no images")]
    NoImages,
}

impl ProductRecord {
    /// Returns every data-quality issue found in this record.
    pub fn lint(&self) -> Vec<RecordIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(RecordIssue::BlankName);
        }
        if self.price < 0.0 {
            issues.push(RecordIssue::NegativePrice(self.price));
        }
        if let Some(compare) = self.compare_price {
            if compare < self.price {
                issues.push(RecordIssue::CompareBelowPrice {
                    price: self.price,
                    compare,
                });
            }
        }
        if self.images.is_empty() {
            issues.push(RecordIssue::NoImages);
        }

        issues
    }
}
