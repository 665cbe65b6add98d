//! Validation outcome mapping
//!
//! Turns a batch of field errors into the status code and message a handler
//! responds with. Body failures map to 405, not 422; clients depend on it.

use serde::Serialize;

use super::{Location, ValidationErrors};

/// Invalid route parameter
pub const STATUS_BAD_REQUEST: u16 = 400;
/// Invalid request body
pub const STATUS_INVALID_INPUT: u16 = 405;
/// Errors that could not be interpreted
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Message used when the first error has no recognised location
pub const VALIDATION_FALLBACK_MESSAGE: &str =
    "Server error encountered in parsing validation errors";

/// Status and message(s) describing a failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorOutcome<M> {
    /// HTTP status code
    #[serde(skip)]
    pub status: u16,
    /// Response message: one string, or every message in order
    pub message: M,
}

/// Status used for failures at `location`
pub fn status_for_location(location: Location) -> u16 {
    match location {
        Location::Params => STATUS_BAD_REQUEST,
        Location::Body => STATUS_INVALID_INPUT,
        Location::Query | Location::Headers | Location::Cookies => STATUS_INTERNAL_ERROR,
    }
}

/// Pick one status and message for the whole batch, driven by its first error.
///
/// Returns `None` for an empty batch; callers only map batches that failed.
pub fn first_error_outcome(errors: &ValidationErrors) -> Option<ErrorOutcome<String>> {
    let first = errors.first()?;

    let outcome = match first.location {
        Location::Params | Location::Body => ErrorOutcome {
            status: status_for_location(first.location),
            message: first.message.clone(),
        },
        _ => ErrorOutcome {
            status: STATUS_INTERNAL_ERROR,
            message: VALIDATION_FALLBACK_MESSAGE.to_string(),
        },
    };
    Some(outcome)
}

/// Report every message in order under the fixed status for `location`.
///
/// Used where a single kind of validation runs (id-only or body-only routes).
/// Returns `None` for an empty batch.
pub fn all_messages(
    errors: &ValidationErrors,
    location: Location,
) -> Option<ErrorOutcome<Vec<String>>> {
    if errors.is_empty() {
        return None;
    }
    Some(ErrorOutcome {
        status: status_for_location(location),
        message: errors.messages(),
    })
}
