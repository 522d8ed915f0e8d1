//! eShop Core - Shared types library.
//!
//! This crate provides common types used across all eShop components:
//! - `api` - The public REST backend (categories, products, orders, users)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! handling. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and upload
//!   image content types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
