//! API handlers

pub mod cupcake;
pub mod health;
