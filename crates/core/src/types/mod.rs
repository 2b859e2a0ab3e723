//! Core types for shoecart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{Cart, CartSnapshotError, UpdateProductAmount};
pub use id::*;
pub use product::{LineItem, Product, StockInfo};
