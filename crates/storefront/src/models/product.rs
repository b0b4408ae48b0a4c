//! Catalog product records.

use serde::{Deserialize, Deserializer, Serialize};

use ny_pizza_core::{Price, ProductId};

/// A catalog product.
///
/// Field names match the backend's JSON (`shortDesc`). Products are
/// append-only on the client: there is no edit or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Client-generated identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Units available.
    #[serde(default, deserialize_with = "lenient_stock")]
    pub stock: u32,
    /// One-line summary.
    #[serde(default)]
    pub short_desc: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
}

impl Product {
    /// Create a product with zero stock and empty descriptions.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock: 0,
            short_desc: String::new(),
            description: String::new(),
        }
    }
}

/// Wire shapes the stock field may take.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStock {
    Count(u32),
    Text(String),
    Missing(()),
}

/// Accept `5`, `"5"`, `""` and `null`; blanks mean zero.
fn lenient_stock<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match RawStock::deserialize(deserializer)? {
        RawStock::Count(n) => Ok(n),
        RawStock::Missing(()) => Ok(0),
        RawStock::Text(s) if s.trim().is_empty() => Ok(0),
        RawStock::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "id": "hfdwf0",
            "name": "Pepperoni",
            "price": "10",
            "stock": "4",
            "shortDesc": "Classic",
            "description": "Tomato, mozzarella, pepperoni"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "hfdwf0");
        assert_eq!(product.price, Price::parse("10").unwrap());
        assert_eq!(product.stock, 4);
        assert_eq!(product.short_desc, "Classic");
    }

    #[test]
    fn test_stock_defaults_to_zero() {
        let missing: Product =
            serde_json::from_str(r#"{"id":"a","name":"Plain","price":8}"#).unwrap();
        assert_eq!(missing.stock, 0);
        assert!(missing.description.is_empty());

        let blank: Product =
            serde_json::from_str(r#"{"id":"a","name":"Plain","price":8,"stock":""}"#).unwrap();
        assert_eq!(blank.stock, 0);

        let null: Product =
            serde_json::from_str(r#"{"id":"a","name":"Plain","price":8,"stock":null}"#).unwrap();
        assert_eq!(null.stock, 0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let product = Product::new(ProductId::new("p1"), "Margherita", Price::parse("9").unwrap());
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["shortDesc"], "");
        assert_eq!(value["price"], "9");
        assert_eq!(value["stock"], 0);
    }
}
