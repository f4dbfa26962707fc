//! Nabta Core - Shared types library.
//!
//! This crate provides common types used across all Nabta components:
//! - `api` - The public REST API server
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. This keeps it lightweight and fully testable
//! without mocks.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, phone numbers, and status enums
//! - [`checkout`] - Coupon and loyalty-point arithmetic used at order time

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod types;

pub use types::*;
