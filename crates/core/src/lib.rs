//! Shoecart Core - Cart types and state transitions.
//!
//! This crate provides the types shared by every shoecart component:
//! - `storefront` - Cart manager service, collaborators and HTTP API
//! - `cli` - Command-line driver for the persisted cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. Every [`Cart`] transition returns a new value, so a
//! cart handed out to an observer is never mutated afterwards.
//!
//! # Modules
//!
//! - [`types`] - Product ids, catalog products, line items, stock and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
