use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::products::repo_types::{NewProduct, Product};

const ALL_FIELDS_REQUIRED: &str = "All fields are required.";

/// Body of `POST /products` and `PUT /products/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub quantity: Option<i32>,
}

/// Accepts `3` and `3.0`; rejects fractional or out-of-range values.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(n) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
        Ok(Some(n as i32))
    } else {
        Err(D::Error::custom(format!("expected a whole number, got {n}")))
    }
}

impl ProductRequest {
    /// Text fields must be non-empty; `price` and `quantity` only need to be present (zero is valid).
    pub fn validate(self) -> Result<NewProduct, AppError> {
        let non_empty = |s: Option<String>| s.filter(|v| !v.is_empty());
        match (
            non_empty(self.name),
            non_empty(self.description),
            non_empty(self.category),
            self.price,
            self.quantity,
        ) {
            (Some(name), Some(description), Some(category), Some(price), Some(quantity)) => {
                Ok(NewProduct {
                    name,
                    description,
                    category,
                    price,
                    quantity,
                })
            }
            _ => Err(AppError::MissingFields(ALL_FIELDS_REQUIRED)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatedProductResponse {
    #[serde(flatten)]
    pub product: Product,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> ProductRequest {
        ProductRequest {
            name: Some("A".into()),
            description: Some("d".into()),
            category: Some("c".into()),
            price: Some(1.5),
            quantity: Some(3),
        }
    }

    #[test]
    fn accepts_complete_request() {
        let p = full().validate().expect("valid");
        assert_eq!(p.name, "A");
        assert_eq!(p.quantity, 3);
    }

    #[test]
    fn zero_price_and_quantity_are_valid() {
        let req = ProductRequest {
            price: Some(0.0),
            quantity: Some(0),
            ..full()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn empty_or_missing_fields_are_rejected() {
        let cases = [
            ProductRequest { name: None, ..full() },
            ProductRequest { description: Some(String::new()), ..full() },
            ProductRequest { category: None, ..full() },
            ProductRequest { price: None, ..full() },
            ProductRequest { quantity: None, ..full() },
            ProductRequest::default(),
        ];
        for req in cases {
            let err = req.validate().unwrap_err();
            assert_eq!(err.to_string(), ALL_FIELDS_REQUIRED);
        }
    }

    #[test]
    fn quantity_accepts_integral_floats() {
        let req: ProductRequest = serde_json::from_str(r#"{"quantity": 3.0}"#).unwrap();
        assert_eq!(req.quantity, Some(3));
        let req: ProductRequest = serde_json::from_str(r#"{"quantity": 7}"#).unwrap();
        assert_eq!(req.quantity, Some(7));
        let req: ProductRequest = serde_json::from_str(r#"{"quantity": null}"#).unwrap();
        assert_eq!(req.quantity, None);
        let req: ProductRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.quantity, None);
    }

    #[test]
    fn quantity_rejects_fractions() {
        assert!(serde_json::from_str::<ProductRequest>(r#"{"quantity": 2.5}"#).is_err());
        assert!(serde_json::from_str::<ProductRequest>(r#"{"quantity": 1e12}"#).is_err());
    }

    #[test]
    fn updated_response_is_flat() {
        let resp = UpdatedProductResponse {
            product: full().validate().unwrap().with_id(4),
            message: "Product updated successfully.",
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["name"], "A");
        assert_eq!(json["message"], "Product updated successfully.");
    }
}
