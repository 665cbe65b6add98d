//! Request validation
//!
//! Field rules are declared as ordered lists of `(field, location, check,
//! message)` tuples and evaluated independently. The resulting errors keep
//! declaration order, which the outcome mapper relies on: id rules are always
//! listed before body rules, so a malformed id is reported first.

mod outcome;
mod rules;

pub use outcome::{
    ErrorOutcome, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_INVALID_INPUT,
    VALIDATION_FALLBACK_MESSAGE, all_messages, first_error_outcome, status_for_location,
};
pub use rules::{CUPCAKE_BODY_RULES, CUPCAKE_ID_PARAM, CUPCAKE_ID_RULES, Check, Rule, validate};

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Where a validated field came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Route parameters (`/cupcake/{cupcakeId}`)
    Params,
    /// JSON request body
    Body,
    /// Query string
    Query,
    /// Request headers
    Headers,
    /// Cookies
    Cookies,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Location::Params => "params",
            Location::Body => "body",
            Location::Query => "query",
            Location::Headers => "headers",
            Location::Cookies => "cookies",
        };
        f.write_str(name)
    }
}

/// One failed field rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `name` or `ingredients[1]`
    pub field: String,
    /// Where the field was read from
    pub location: Location,
    /// Rule message
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(field: impl Into<String>, location: Location, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            location,
            message: message.into(),
        }
    }
}

/// Ordered validation failures for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Wrap an ordered error list
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Whether every rule passed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failures
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// First failure in declaration order
    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    /// Iterate failures in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// Failure messages in declaration order
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

/// The parts of a request that rules can inspect
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    /// Raw route parameters
    pub params: BTreeMap<String, String>,
    /// Parsed JSON body (`{}` when the request carried none)
    pub body: Value,
}

impl RequestData {
    /// Empty request: no params, `{}` body
    pub fn new() -> Self {
        Self {
            params: BTreeMap::new(),
            body: Value::Object(Default::default()),
        }
    }

    /// Add a route parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Look up `field` at `location`.
    ///
    /// Only params and body are carried; other locations always read as
    /// absent.
    pub fn lookup(&self, location: Location, field: &str) -> Option<Value> {
        match location {
            Location::Params => self.params.get(field).cloned().map(Value::String),
            Location::Body => self.body.get(field).cloned(),
            Location::Query | Location::Headers | Location::Cookies => None,
        }
    }
}
