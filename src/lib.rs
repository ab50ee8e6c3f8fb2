//! Medianator Library
//!
//! Oracle client for the medianator program: merges signed price reports into
//! the shared median set and submits it as a fixed-width program call.

pub mod backend;
pub mod config;
pub mod error;
pub mod executor;
pub mod feed;
pub mod medianator;
pub mod signer;

pub use error::{MedianatorError, Result};
