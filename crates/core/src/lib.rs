//! Lustre Core - Shared types library.
//!
//! This crate provides common types used across all Lustre components:
//! - `fulfillment` - Inventory allocation and fulfillment classification engine
//! - `cli` - Command-line runner for allocation passes
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, statuses and
//!   variant option signatures

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
