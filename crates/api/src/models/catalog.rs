//! Catalog domain types: categories and products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use srrobot_core::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "id_categoria")]
    pub id: CategoryId,
    /// Unique, trimmed name. Products reference the category by this name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Free text, empty when none was supplied.
    #[serde(rename = "descripcion")]
    pub description: String,
}

/// Category create/update request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
}

/// A catalog product.
///
/// Money and percentages are exact decimals in storage and plain JSON
/// numbers on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "id_producto")]
    pub id: ProductId,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    #[serde(rename = "discount", with = "rust_decimal::serde::float_option")]
    pub discount_percent: Option<Decimal>,
    #[serde(rename = "image")]
    pub image_url: String,
    pub description: String,
    #[serde(rename = "characteristics")]
    pub spec_text: String,
    pub product_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rating: Decimal,
    #[serde(rename = "reviews")]
    pub review_count: i32,
    pub in_stock: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Product create/update request body, as sent by the client.
///
/// Numeric fields stay raw JSON so that numeric strings (`"50"`) are accepted
/// and non-numeric values are reported by validation instead of the body
/// extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<serde_json::Value>,
    pub original_price: Option<serde_json::Value>,
    pub discount: Option<serde_json::Value>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub characteristics: Option<String>,
    pub product_code: Option<String>,
    pub in_stock: Option<bool>,
}

/// A product that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub category: String,
    pub name: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub image_url: String,
    pub description: String,
    pub spec_text: String,
    pub product_code: String,
    pub in_stock: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_format() {
        let product = Product {
            id: ProductId::new(7),
            category: "Gaming".to_string(),
            name: "Mouse".to_string(),
            price: Decimal::new(4999, 2),
            original_price: None,
            discount_percent: Some(Decimal::new(10, 0)),
            image_url: "https://cdn.srrobot.com/mouse.png".to_string(),
            description: "Wireless".to_string(),
            spec_text: "2.4GHz".to_string(),
            product_code: "MS-01".to_string(),
            rating: Decimal::new(45, 1),
            review_count: 0,
            in_stock: true,
            featured: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id_producto"], 7);
        assert_eq!(json["categoria"], "Gaming");
        assert_eq!(json["nombre"], "Mouse");
        assert_eq!(json["price"], 49.99);
        assert!(json["originalPrice"].is_null());
        assert_eq!(json["discount"], 10.0);
        assert_eq!(json["image"], "https://cdn.srrobot.com/mouse.png");
        assert_eq!(json["characteristics"], "2.4GHz");
        assert_eq!(json["productCode"], "MS-01");
        assert_eq!(json["rating"], 4.5);
        assert_eq!(json["reviews"], 0);
        assert_eq!(json["inStock"], true);
        assert_eq!(json["featured"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_product_input_keeps_raw_numbers() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name":"Mouse","price":"50","discount":null}"#).unwrap();
        assert_eq!(input.price, Some(serde_json::json!("50")));
        assert!(input.discount.is_none());
        assert!(input.in_stock.is_none());
    }

    #[test]
    fn test_category_wire_format() {
        let category = Category {
            id: CategoryId::new(1),
            name: "Gaming".to_string(),
            description: String::new(),
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id_categoria": 1, "nombre": "Gaming", "descripcion": "" })
        );
    }
}
