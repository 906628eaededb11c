//! # mapsync-core
//!
//! Core crate for mapsync. Contains the unified error system, the result
//! alias, and the configuration schemas read once at startup.
//!
//! This crate has **no** internal dependencies on other mapsync crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
