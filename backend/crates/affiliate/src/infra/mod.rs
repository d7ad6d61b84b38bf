//! Infrastructure Layer
//!
//! In-memory data provider standing in for the dashboard API.

pub mod fixtures;
pub mod memory;
