//! Product categories and order line items.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ProductId;

/// The category of a product, which drives the availability rules
/// applied by the inventory validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    /// Plain stock-counted product.
    Standard,

    /// Stock-counted product with an expiration date.
    Perishable,

    /// Product with no physical stock; always deliverable.
    Digital,
}

impl ProductCategory {
    /// Returns the wire name of the category (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Standard => "standard",
            ProductCategory::Perishable => "perishable",
            ProductCategory::Digital => "digital",
        }
    }

    /// Parses a category name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(ProductCategory::Standard),
            "perishable" => Some(ProductCategory::Perishable),
            "digital" => Some(ProductCategory::Digital),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Categories travel lowercase on the wire, but producers written against
// earlier payload versions send uppercase names, so parsing is lenient.
impl Serialize for ProductCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProductCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        ProductCategory::parse(&value)
            .ok_or_else(|| D::Error::custom(format!("unknown product category: {value}")))
    }
}

/// A single line of an order as declared by the requester.
///
/// The category here is what the client claims; validation re-derives
/// the truth from the catalog and never trusts this field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The requested product.
    pub product_id: ProductId,
    /// Requested quantity. Positivity is enforced at the intake boundary.
    pub quantity: u32,
    /// Category declared by the requester.
    pub category: ProductCategory,
}

impl OrderItem {
    /// Creates a new order line item.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, category: ProductCategory) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&ProductCategory::Perishable).unwrap();
        assert_eq!(json, "\"perishable\"");
    }

    #[test]
    fn category_deserializes_case_insensitively() {
        let parsed: ProductCategory = serde_json::from_str("\"STANDARD\"").unwrap();
        assert_eq!(parsed, ProductCategory::Standard);

        let parsed: ProductCategory = serde_json::from_str("\" Digital \"").unwrap();
        assert_eq!(parsed, ProductCategory::Digital);
    }

    #[test]
    fn category_rejects_unknown_names() {
        let result: Result<ProductCategory, _> = serde_json::from_str("\"frozen\"");
        assert!(result.is_err());
    }

    #[test]
    fn order_item_uses_camel_case_fields() {
        let item = OrderItem::new("P1001", 3, ProductCategory::Standard);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "P1001");
        assert_eq!(json["quantity"], 3);
        assert_eq!(json["category"], "standard");
    }

    #[test]
    fn order_item_roundtrip() {
        let item = OrderItem::new("P2001", 1, ProductCategory::Perishable);
        let json = serde_json::to_string(&item).unwrap();
        let parsed: OrderItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }
}
