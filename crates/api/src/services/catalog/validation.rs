//! Product field validation.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. required fields present (strings trimmed, blank counts as missing)
//! 2. price numeric and in `(0, 10000]`
//! 3. discount, if given, numeric and in `[0, 100]`
//! 4. original price, if given, numeric and in `(0, MAX_ORIGINAL_PRICE]`
//! 5. image is an absolute URL
//!
//! Amounts are rounded to cents before the bounds are checked, the same way
//! the store rounds them on insert.
//!
//! Category existence needs the store and is checked by the service afterwards.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::{ProductDraft, ProductInput};

/// Highest accepted price.
pub const MAX_PRICE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
/// Highest original price a `NUMERIC(12, 2)` column holds.
pub const MAX_ORIGINAL_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);
/// Decimal places kept for amounts.
const SCALE: u32 = 2;
/// Highest accepted discount percentage.
pub const MAX_DISCOUNT: Decimal = Decimal::ONE_HUNDRED;

/// Reasons a product payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    #[error("Todos los campos requeridos deben estar presentes")]
    MissingFields,

    #[error("El precio debe ser un número entre 0.01 y 10000")]
    InvalidPrice,

    #[error("El descuento debe ser un número entre 0 y 100")]
    InvalidDiscount,

    #[error("El precio original debe ser un número positivo y menor que 10000000000")]
    InvalidOriginalPrice,

    #[error("La URL de la imagen es inválida")]
    InvalidImageUrl,
}

/// Trimmed, non-empty text.
fn text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Whether a raw numeric field was supplied at all.
fn supplied(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

/// Parse a JSON number or numeric string.
fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(|f| Decimal::try_from(f).ok())),
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

/// Parse and round to cents.
fn amount(value: &Value) -> Option<Decimal> {
    decimal(value).map(|d| d.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Validate a product payload, producing a draft ready to persist.
///
/// # Errors
///
/// Returns the first failing check, in the order listed in the module docs.
pub fn validate(input: &ProductInput) -> Result<ProductDraft, ProductValidationError> {
    // 1. presence
    let (
        Some(name),
        Some(category),
        Some(price),
        Some(image_url),
        Some(description),
        Some(spec_text),
        Some(product_code),
    ) = (
        text(input.name.as_deref()),
        text(input.category.as_deref()),
        supplied(input.price.as_ref()),
        text(input.image.as_deref()),
        text(input.description.as_deref()),
        text(input.characteristics.as_deref()),
        text(input.product_code.as_deref()),
    )
    else {
        return Err(ProductValidationError::MissingFields);
    };

    // 2. price
    let price = amount(price)
        .filter(|p| *p > Decimal::ZERO && *p <= MAX_PRICE)
        .ok_or(ProductValidationError::InvalidPrice)?;

    // 3. discount
    let discount_percent = supplied(input.discount.as_ref())
        .map(|v| {
            amount(v)
                .filter(|d| *d >= Decimal::ZERO && *d <= MAX_DISCOUNT)
                .ok_or(ProductValidationError::InvalidDiscount)
        })
        .transpose()?;

    // 4. original price
    let original_price = supplied(input.original_price.as_ref())
        .map(|v| {
            amount(v)
                .filter(|p| *p > Decimal::ZERO && *p <= MAX_ORIGINAL_PRICE)
                .ok_or(ProductValidationError::InvalidOriginalPrice)
        })
        .transpose()?;

    // 5. image URL
    if Url::parse(&image_url).is_err() {
        return Err(ProductValidationError::InvalidImageUrl);
    }

    Ok(ProductDraft {
        category,
        name,
        price,
        original_price,
        discount_percent,
        image_url,
        description,
        spec_text,
        product_code,
        in_stock: input.in_stock.unwrap_or(true),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn valid() -> ProductInput {
        ProductInput {
            name: Some("  Teclado RGB ".to_string()),
            category: Some("Gaming".to_string()),
            price: Some(json!(50)),
            original_price: None,
            discount: None,
            image: Some("https://cdn.srrobot.com/teclado.png".to_string()),
            description: Some("Mecánico".to_string()),
            characteristics: Some("Switches rojos".to_string()),
            product_code: Some("TK-01".to_string()),
            in_stock: None,
        }
    }

    #[test]
    fn test_valid_payload_is_trimmed_and_defaulted() {
        let draft = validate(&valid()).unwrap();
        assert_eq!(draft.name, "Teclado RGB");
        assert_eq!(draft.price, Decimal::from(50));
        assert!(draft.in_stock);
        assert_eq!(draft.discount_percent, None);
        assert_eq!(draft.original_price, None);
    }

    #[test]
    fn test_missing_field_is_reported_first() {
        let input = ProductInput {
            characteristics: Some("   ".to_string()),
            price: Some(json!(0)),
            image: Some("not a url".to_string()),
            ..valid()
        };
        assert_eq!(validate(&input), Err(ProductValidationError::MissingFields));

        let input = ProductInput {
            price: None,
            ..valid()
        };
        assert_eq!(validate(&input), Err(ProductValidationError::MissingFields));
    }

    #[test]
    fn test_price_bounds() {
        for price in [json!(0), json!(-1), json!(10001), json!(10000.01), json!("abc"), json!(true)] {
            let input = ProductInput {
                price: Some(price.clone()),
                ..valid()
            };
            assert_eq!(
                validate(&input),
                Err(ProductValidationError::InvalidPrice),
                "price {price} should be rejected"
            );
        }

        for price in [json!(0.01), json!(10000), json!("49.99"), json!(" 15 ")] {
            let input = ProductInput {
                price: Some(price.clone()),
                ..valid()
            };
            assert!(validate(&input).is_ok(), "price {price} should be accepted");
        }
    }

    #[test]
    fn test_discount_bounds() {
        let input = ProductInput {
            discount: Some(json!(101)),
            ..valid()
        };
        assert_eq!(validate(&input), Err(ProductValidationError::InvalidDiscount));

        let input = ProductInput {
            discount: Some(json!(-5)),
            ..valid()
        };
        assert_eq!(validate(&input), Err(ProductValidationError::InvalidDiscount));

        let input = ProductInput {
            discount: Some(json!(0)),
            ..valid()
        };
        assert_eq!(validate(&input).unwrap().discount_percent, Some(Decimal::ZERO));

        let input = ProductInput {
            discount: Some(json!("")),
            ..valid()
        };
        assert_eq!(validate(&input).unwrap().discount_percent, None);
    }

    #[test]
    fn test_original_price_must_be_positive() {
        let input = ProductInput {
            original_price: Some(json!(0)),
            ..valid()
        };
        assert_eq!(
            validate(&input),
            Err(ProductValidationError::InvalidOriginalPrice)
        );

        let input = ProductInput {
            original_price: Some(json!("75.5")),
            ..valid()
        };
        assert_eq!(
            validate(&input).unwrap().original_price,
            Some(Decimal::new(755, 1))
        );
    }

    #[test]
    fn test_amounts_are_checked_at_cent_precision() {
        for price in [json!(0.001), json!("0.004"), json!("10000.005")] {
            let input = ProductInput {
                price: Some(price.clone()),
                ..valid()
            };
            assert_eq!(
                validate(&input),
                Err(ProductValidationError::InvalidPrice),
                "price {price} should be rejected"
            );
        }

        let input = ProductInput {
            price: Some(json!("10000.004")),
            ..valid()
        };
        assert_eq!(validate(&input).unwrap().price, MAX_PRICE);

        let input = ProductInput {
            price: Some(json!("19.999")),
            ..valid()
        };
        assert_eq!(validate(&input).unwrap().price, Decimal::new(2000, 2));

        for original in [json!(0.001), json!(1e12), json!("10000000000")] {
            let input = ProductInput {
                original_price: Some(original.clone()),
                ..valid()
            };
            assert_eq!(
                validate(&input),
                Err(ProductValidationError::InvalidOriginalPrice),
                "original price {original} should be rejected"
            );
        }

        assert_eq!(MAX_ORIGINAL_PRICE, Decimal::from_str("9999999999.99").unwrap());
        let input = ProductInput {
            original_price: Some(json!("9999999999.99")),
            ..valid()
        };
        assert_eq!(
            validate(&input).unwrap().original_price,
            Some(MAX_ORIGINAL_PRICE)
        );
    }

    #[test]
    fn test_checks_run_in_order() {
        // Bad discount and bad image: discount is reported.
        let input = ProductInput {
            discount: Some(json!(500)),
            image: Some("nope".to_string()),
            ..valid()
        };
        assert_eq!(validate(&input), Err(ProductValidationError::InvalidDiscount));

        // Bad original price and bad image: original price is reported.
        let input = ProductInput {
            original_price: Some(json!(-3)),
            image: Some("nope".to_string()),
            ..valid()
        };
        assert_eq!(
            validate(&input),
            Err(ProductValidationError::InvalidOriginalPrice)
        );
    }

    #[test]
    fn test_image_must_be_absolute_url() {
        for image in ["teclado.png", "/img/teclado.png", "http//broken"] {
            let input = ProductInput {
                image: Some(image.to_string()),
                ..valid()
            };
            assert_eq!(
                validate(&input),
                Err(ProductValidationError::InvalidImageUrl),
                "{image} should be rejected"
            );
        }
    }

    #[test]
    fn test_in_stock_is_kept_when_given() {
        let input = ProductInput {
            in_stock: Some(false),
            ..valid()
        };
        assert!(!validate(&input).unwrap().in_stock);
    }
}
