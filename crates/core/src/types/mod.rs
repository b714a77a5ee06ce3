//! Core types for Lustre.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod option;
pub mod price;
pub mod status;

pub use id::*;
pub use option::{OptionDimension, OptionError, OptionSignature};
pub use price::{CurrencyCode, Price};
pub use status::*;
