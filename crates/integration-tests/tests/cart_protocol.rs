//! Integration tests for the cart synchronization protocol.
//!
//! These tests drive `CartManager` through its notifying API against a
//! file-backed snapshot and check what a restarted manager sees.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use shoecart_core::{Cart, ProductId, UpdateProductAmount};
use shoecart_integration_tests::{TestContext, shoe};
use shoecart_storefront::cart::{Notice, RecordingNotifier};
use shoecart_storefront::inventory::MemoryInventory;
use shoecart_storefront::state::build_offline_cart_manager;

fn id(n: i32) -> ProductId {
    ProductId::new(n)
}

fn set(product_id: i32, amount: i64) -> UpdateProductAmount {
    UpdateProductAmount {
        product_id: id(product_id),
        amount,
    }
}

// =============================================================================
// Operation Properties
// =============================================================================

#[tokio::test]
async fn test_add_beyond_stock_leaves_cart_empty() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(1), 0)).await;

    ctx.manager.add_product(id(1)).await;

    assert!(ctx.manager.cart().await.is_empty());
    assert!(ctx.snapshot().is_none());
    assert_eq!(ctx.notifier.notices(), vec![Notice::StockExceeded]);
}

#[tokio::test]
async fn test_add_then_increment() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(1), 5)).await;

    ctx.manager.add_product(id(1)).await;
    ctx.manager.add_product(id(1)).await;

    assert_eq!(ctx.amounts().await, vec![(1, 2)]);
    assert!(ctx.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_remove_present() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(1), 5)).await;
    ctx.manager.add_product(id(1)).await;
    ctx.manager.add_product(id(1)).await;

    ctx.manager.remove_product(id(1)).await;

    assert!(ctx.manager.cart().await.is_empty());
    assert_eq!(ctx.snapshot().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_remove_absent() {
    let ctx = TestContext::new(MemoryInventory::new()).await;

    ctx.manager.remove_product(id(1)).await;

    assert!(ctx.manager.cart().await.is_empty());
    assert!(ctx.snapshot().is_none());
    assert_eq!(ctx.notifier.notices(), vec![Notice::RemoveFailed]);
}

#[tokio::test]
async fn test_update_beyond_stock() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(1), 1)).await;
    ctx.manager.add_product(id(1)).await;
    let before = ctx.snapshot();

    ctx.manager.update_product_amount(set(1, 5)).await;

    assert_eq!(ctx.amounts().await, vec![(1, 1)]);
    assert_eq!(ctx.snapshot(), before);
    assert_eq!(ctx.notifier.notices(), vec![Notice::StockExceeded]);
}

#[tokio::test]
async fn test_update_non_positive_is_byte_for_byte_noop() {
    let ctx = TestContext::new(
        MemoryInventory::new()
            .with_product(shoe(1), 3)
            .with_product(shoe(2), 3),
    )
    .await;
    ctx.manager.add_product(id(2)).await;
    ctx.manager.add_product(id(1)).await;
    let before = ctx.snapshot();
    let cart_before = ctx.manager.cart().await;

    ctx.manager.update_product_amount(set(1, 0)).await;
    ctx.manager.update_product_amount(set(1, -3)).await;

    assert_eq!(ctx.snapshot(), before);
    assert_eq!(ctx.manager.cart().await, cart_before);
    assert!(ctx.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_update_absent_product_is_silent() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(1), 3)).await;

    ctx.manager.update_product_amount(set(1, 2)).await;

    assert!(ctx.manager.cart().await.is_empty());
    assert!(ctx.snapshot().is_none());
    assert!(ctx.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_inventory_outage_rolls_back_add() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(1), 3)).await;
    ctx.manager.add_product(id(1)).await;
    let before = ctx.snapshot();

    // Product 2 is unknown to the inventory.
    ctx.manager.add_product(id(2)).await;

    assert_eq!(ctx.amounts().await, vec![(1, 1)]);
    assert_eq!(ctx.snapshot(), before);
    assert_eq!(ctx.notifier.notices(), vec![Notice::AddFailed]);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_restart_sees_committed_cart() {
    let ctx = TestContext::new(
        MemoryInventory::new()
            .with_product(shoe(3), 10)
            .with_product(shoe(1), 10)
            .with_product(shoe(2), 10),
    )
    .await;

    ctx.manager.add_product(id(3)).await;
    ctx.manager.add_product(id(1)).await;
    ctx.manager.add_product(id(2)).await;
    ctx.manager.update_product_amount(set(1, 4)).await;
    ctx.manager.remove_product(id(3)).await;

    let restarted = ctx.reopen().await;

    assert_eq!(restarted.amounts().await, vec![(1, 4), (2, 1)]);
    assert_eq!(restarted.manager.cart().await, ctx.manager.cart().await);
}

#[tokio::test]
async fn test_snapshot_round_trip_is_exact() {
    let ctx = TestContext::new(
        MemoryInventory::new()
            .with_product(shoe(1), 10)
            .with_product(shoe(2), 10),
    )
    .await;
    ctx.manager.add_product(id(2)).await;
    ctx.manager.add_product(id(1)).await;
    ctx.manager.add_product(id(2)).await;

    let written = ctx.snapshot().unwrap();
    let parsed = Cart::from_json(&written).unwrap();

    assert_eq!(parsed, ctx.manager.cart().await);
    assert_eq!(parsed.to_json().unwrap(), written);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(1), 10)).await;
    std::fs::create_dir_all(ctx.store.dir()).unwrap();
    std::fs::write(
        ctx.store
            .path_for(shoecart_storefront::storage::CART_STORAGE_KEY),
        r#"[{"id":1,"title":"Shoe 1","price":"99.90","amount":1},{"id":1,"title":"Shoe 1","price":"99.90","amount":2}]"#,
    )
    .unwrap();

    let restarted = ctx.reopen().await;
    assert!(restarted.manager.cart().await.is_empty());

    // The next commit replaces the bad snapshot.
    restarted.manager.add_product(id(1)).await;
    assert_eq!(restarted.reopen().await.amounts().await, vec![(1, 1)]);
}

#[tokio::test]
async fn test_offline_manager_removes_without_inventory() {
    let ctx = TestContext::new(
        MemoryInventory::new()
            .with_product(shoe(1), 5)
            .with_product(shoe(2), 5),
    )
    .await;
    ctx.manager.add_product(id(1)).await;
    ctx.manager.add_product(id(2)).await;

    let notifier = Arc::new(RecordingNotifier::new());
    let offline = build_offline_cart_manager(&ctx.config().storage, notifier.clone()).await;
    assert_eq!(offline.cart().await, ctx.manager.cart().await);

    offline.remove_product(id(1)).await;
    offline.add_product(id(1)).await;

    assert_eq!(ctx.reopen().await.amounts().await, vec![(2, 1)]);
    assert_eq!(notifier.notices(), vec![Notice::AddFailed]);
}

#[tokio::test]
async fn test_snapshot_stores_catalog_metadata() {
    let ctx = TestContext::new(MemoryInventory::new().with_product(shoe(7), 1)).await;
    ctx.manager.add_product(id(7)).await;

    let value: serde_json::Value = serde_json::from_str(&ctx.snapshot().unwrap()).unwrap();
    let line = &value[0];

    assert_eq!(line["id"], 7);
    assert_eq!(line["title"], "Shoe 7");
    assert_eq!(line["image"], "https://cdn.example.com/7.jpg");
    assert_eq!(line["amount"], 1);
}

// =============================================================================
// Invariants
// =============================================================================

#[tokio::test]
async fn test_invariants_hold_across_mixed_operations() {
    let ctx = TestContext::new(
        MemoryInventory::new()
            .with_product(shoe(1), 2)
            .with_product(shoe(2), 4)
            .with_product(shoe(3), 1),
    )
    .await;

    for step in 0..40_i32 {
        let product = step % 3 + 1;
        match step % 5 {
            0 | 1 => ctx.manager.add_product(id(product)).await,
            2 => ctx.manager.update_product_amount(set(product, i64::from(step % 4) - 1)).await,
            3 => ctx.manager.remove_product(id(product)).await,
            _ => ctx.inventory.set_stock(id(product), u32::try_from(step % 4).unwrap()),
        }

        let cart = ctx.manager.cart().await;
        let mut seen = Vec::new();
        for item in &cart {
            assert!(item.amount >= 1, "zero amount at step {step}");
            assert!(
                !seen.contains(&item.product_id()),
                "duplicate line at step {step}"
            );
            seen.push(item.product_id());
        }
    }

    let restarted = ctx.reopen().await;
    assert_eq!(restarted.manager.cart().await, ctx.manager.cart().await);
}
