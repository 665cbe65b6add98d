//! Cupcake Core - record model, request validation and record store
//!
//! This crate provides everything behind the cupcake REST API except the
//! HTTP layer:
//! - Cupcake record model with price coercion
//! - Declarative field rules for route parameters and request bodies
//! - Mapping of validation failures to a status code and message
//! - In-memory record store checkpointed to a single JSON file
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │         Resource handlers (server)           │
//! └──────┬───────────────────────────┬──────────┘
//!        │                           │
//! ┌──────┴──────────────┐   ┌───────┴──────────┐
//! │     Validation      │   │   Record store    │
//! │ (rules + outcome)   │   │ (map + JSON file) │
//! └─────────────────────┘   └──────────────────┘
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod model;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use model::{Cupcake, CupcakeBody, CupcakeId};
pub use store::CupcakeStore;
