//! Cupcake record model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Identifier assigned by the store at creation time
pub type CupcakeId = u64;

/// Caller-supplied cupcake fields (everything but the id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupcakeBody {
    /// Display name
    pub name: String,
    /// Price, always stored as a number
    pub price: f64,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered ingredient list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

/// A stored cupcake record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cupcake {
    /// Store-assigned id
    pub id: CupcakeId,
    /// Display name
    pub name: String,
    /// Price
    pub price: f64,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered ingredient list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

impl CupcakeBody {
    /// Build a body from a request payload that already passed the body rules.
    ///
    /// `price` is coerced to a number here. Fields the rules did not accept
    /// produce [`Error::Validation`].
    pub fn from_validated(body: &Value) -> Result<Self> {
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::validation("name is not a string"))?
            .to_string();

        let price = body
            .get("price")
            .and_then(coerce_price)
            .ok_or_else(|| Error::validation("price is not numeric"))?;

        let description = match body.get("description") {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(Error::validation("description is not a string")),
        };

        let ingredients = match body.get("ingredients") {
            None => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| Error::validation("ingredient is not a string"))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(_) => return Err(Error::validation("ingredients is not an array")),
        };

        Ok(Self {
            name,
            price,
            description,
            ingredients,
        })
    }

    /// Attach an id, producing a full record
    pub fn into_cupcake(self, id: CupcakeId) -> Cupcake {
        Cupcake {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            ingredients: self.ingredients,
        }
    }
}

impl Cupcake {
    /// Strip the id, keeping the caller-visible fields
    pub fn into_body(self) -> CupcakeBody {
        CupcakeBody {
            name: self.name,
            price: self.price,
            description: self.description,
            ingredients: self.ingredients,
        }
    }
}

/// Interpret a JSON value as a price.
///
/// Numbers are taken as-is; strings are accepted when they parse to a finite
/// number (surrounding whitespace ignored). Everything else is rejected.
pub fn coerce_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_price() {
        assert_eq!(coerce_price(&json!(5)), Some(5.0));
        assert_eq!(coerce_price(&json!(2.5)), Some(2.5));
        assert_eq!(coerce_price(&json!("7")), Some(7.0));
        assert_eq!(coerce_price(&json!(" 3.25 ")), Some(3.25));
        assert_eq!(coerce_price(&json!("free")), None);
        assert_eq!(coerce_price(&json!("NaN")), None);
        assert_eq!(coerce_price(&json!("inf")), None);
        assert_eq!(coerce_price(&json!(true)), None);
        assert_eq!(coerce_price(&json!(null)), None);
    }

    #[test]
    fn test_from_validated_full_body() {
        let body = json!({
            "name": "Kara's cupcake",
            "price": "5",
            "description": "Store this Kara's cupcake",
            "ingredients": ["flour", "eggs", "sugar"]
        });

        let cupcake = CupcakeBody::from_validated(&body).unwrap();
        assert_eq!(cupcake.name, "Kara's cupcake");
        assert_eq!(cupcake.price, 5.0);
        assert_eq!(
            cupcake.description.as_deref(),
            Some("Store this Kara's cupcake")
        );
        assert_eq!(
            cupcake.ingredients,
            Some(vec![
                "flour".to_string(),
                "eggs".to_string(),
                "sugar".to_string()
            ])
        );
    }

    #[test]
    fn test_from_validated_rejects_bad_fields() {
        assert!(CupcakeBody::from_validated(&json!({"price": 1})).is_err());
        assert!(CupcakeBody::from_validated(&json!({"name": "a", "price": "x"})).is_err());
        assert!(
            CupcakeBody::from_validated(&json!({"name": "a", "price": 1, "ingredients": [1]}))
                .is_err()
        );
    }

    #[test]
    fn test_optional_fields_are_omitted_when_serialized() {
        let cupcake = CupcakeBody {
            name: "Plain".to_string(),
            price: 3.0,
            description: None,
            ingredients: None,
        }
        .into_cupcake(9);

        let value = serde_json::to_value(&cupcake).unwrap();
        assert_eq!(value, json!({"id": 9, "name": "Plain", "price": 3.0}));
    }

    #[test]
    fn test_body_round_trips_through_record() {
        let body = CupcakeBody {
            name: "Lemon".to_string(),
            price: 4.5,
            description: Some("tart".to_string()),
            ingredients: Some(vec!["lemon".to_string()]),
        };
        let record = body.clone().into_cupcake(1);
        assert_eq!(record.id, 1);
        assert_eq!(record.into_body(), body);
    }
}
