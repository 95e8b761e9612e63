//! Core types and trait definitions for the parish registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod baptism;
pub mod certificate;
pub mod error;
pub mod marriage;
pub mod member;
pub mod record_number;
pub mod sacrament;
pub mod store;
pub mod validate;

pub use error::{Classify, Error, ErrorClass, Result};
pub use validate::ValidationErrors;
