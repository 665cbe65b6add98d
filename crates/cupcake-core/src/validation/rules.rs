//! Declared field rules for the cupcake routes

use serde_json::Value;

use super::{FieldError, Location, RequestData, ValidationErrors};
use crate::model::coerce_price;

/// Route parameter carrying the cupcake id
pub const CUPCAKE_ID_PARAM: &str = "cupcakeId";

/// Predicate applied to one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Present, not empty, and a string
    RequiredString,
    /// Present, not empty, and numeric (number or numeric string)
    RequiredNumeric,
    /// Absent, or a string
    OptionalString,
    /// Absent, or an array
    OptionalArray,
    /// Every item of an array field is a string; one error per bad item
    EachString,
    /// Present and an integer literal
    Integer,
}

/// One declared rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Field name at `location`
    pub field: &'static str,
    /// Where to read the field from
    pub location: Location,
    /// Predicate
    pub check: Check,
    /// Message reported on failure
    pub message: &'static str,
}

/// Rules for a cupcake create/update body
pub const CUPCAKE_BODY_RULES: &[Rule] = &[
    Rule::body(
        "name",
        Check::RequiredString,
        "cupcake name cannot be empty and must be string",
    ),
    Rule::body(
        "price",
        Check::RequiredNumeric,
        "cupcake price cannot be empty and must be numeric",
    ),
    Rule::body(
        "description",
        Check::OptionalString,
        "description must be string",
    ),
    Rule::body(
        "ingredients",
        Check::OptionalArray,
        "ingredients must be an array of strings",
    ),
    Rule::body(
        "ingredients",
        Check::EachString,
        "ingredient items must be string",
    ),
];

/// Rules for the `cupcakeId` route parameter
pub const CUPCAKE_ID_RULES: &[Rule] = &[Rule::param(
    CUPCAKE_ID_PARAM,
    Check::Integer,
    "cupcakeId must be an integer",
)];

impl Rule {
    /// Rule on a body field
    pub const fn body(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            location: Location::Body,
            check,
            message,
        }
    }

    /// Rule on a route parameter
    pub const fn param(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            location: Location::Params,
            check,
            message,
        }
    }

    /// Evaluate against `req`, returning this rule's failures in order
    pub fn evaluate(&self, req: &RequestData) -> Vec<FieldError> {
        let value = req.lookup(self.location, self.field);

        if self.check == Check::EachString {
            let Some(Value::Array(items)) = value else {
                return Vec::new();
            };
            return items
                .iter()
                .enumerate()
                .filter(|(_, item)| !item.is_string())
                .map(|(i, _)| {
                    FieldError::new(format!("{}[{}]", self.field, i), self.location, self.message)
                })
                .collect();
        }

        let passed = match (self.check, value.as_ref()) {
            (Check::RequiredString, v) => !is_empty(v) && v.is_some_and(Value::is_string),
            (Check::RequiredNumeric, v) => !is_empty(v) && v.and_then(coerce_price).is_some(),
            (Check::OptionalString, None) | (Check::OptionalArray, None) => true,
            (Check::OptionalString, Some(v)) => v.is_string(),
            (Check::OptionalArray, Some(v)) => v.is_array(),
            (Check::Integer, Some(Value::String(s))) => is_integer_literal(s),
            (Check::Integer, Some(Value::Number(n))) => n.is_i64() || n.is_u64(),
            (Check::Integer, _) => false,
            // item failures are collected above
            (Check::EachString, _) => true,
        };

        if passed {
            Vec::new()
        } else {
            vec![FieldError::new(self.field, self.location, self.message)]
        }
    }
}

/// Run every rule of every set, in order, collecting all failures
pub fn validate(req: &RequestData, rule_sets: &[&[Rule]]) -> ValidationErrors {
    let errors = rule_sets
        .iter()
        .flat_map(|rules| rules.iter())
        .flat_map(|rule| rule.evaluate(req))
        .collect();
    ValidationErrors::new(errors)
}

/// Absent, null, or a value whose string form is empty
fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Optional sign followed by at least one ASCII digit
fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
