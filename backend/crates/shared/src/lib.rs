//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the dashboard vocabulary:
//! - The unified error type and result alias
//! - Prefixed, typed identifiers (`user_1`, `camp_3`, ...)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across the platform and affiliate crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

pub use error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};
pub use id::Id;
