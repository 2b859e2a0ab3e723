//! Shoecart Storefront library.
//!
//! This crate provides the cart manager and its collaborators as a library,
//! allowing the HTTP binary and the CLI to share them and tests to drive them.
//!
//! # Modules
//!
//! - [`cart`] - `CartManager`, the cart state machine and its notices
//! - [`inventory`] - Stock and catalog lookups
//! - [`storage`] - Durable key-value store for the cart snapshot
//! - [`routes`] - JSON cart API
//! - [`state`] - Shared application state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod inventory;
pub mod routes;
pub mod state;
pub mod storage;
