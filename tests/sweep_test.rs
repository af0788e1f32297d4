//! Expired manual tier sweep tests.

mod common;

use common::{at, TestApp};
use rust_decimal_macros::dec;

#[tokio::test]
async fn sweep_clears_expired_manual_tiers() {
    let app = TestApp::spawn().await;
    let vendor_id = app.create_vendor(0, None);
    let gold = app.tier_id("Gold").await;
    app.tiers
        .assign_manual_tier(vendor_id, gold, Some(at(5)), at(1))
        .await
        .unwrap();

    let report = app.pricing.sweep_expired_manual_tiers(at(10)).await.unwrap();

    assert_eq!(report.cleared_count, 1);
    assert!(report.errors.is_empty());

    let vendor = app.store.vendor(vendor_id);
    assert_eq!(vendor.manual_tier_id, None);
    assert_eq!(vendor.manual_tier_expires_at, None);
    assert_eq!(vendor.current_tier_id, Some(app.tier_id("Bronze").await));
    assert_eq!(vendor.current_commission_rate, dec!(12));
}

#[tokio::test]
async fn sweep_is_idempotent() {
    let app = TestApp::spawn().await;
    let vendor_id = app.create_vendor(0, None);
    let gold = app.tier_id("Gold").await;
    app.tiers
        .assign_manual_tier(vendor_id, gold, Some(at(5)), at(1))
        .await
        .unwrap();

    let first = app.pricing.sweep_expired_manual_tiers(at(10)).await.unwrap();
    let second = app.pricing.sweep_expired_manual_tiers(at(10)).await.unwrap();

    assert_eq!(first.cleared_count, 1);
    assert_eq!(second.cleared_count, 0);
}

#[tokio::test]
async fn sweep_leaves_unexpired_and_indefinite_tiers_alone() {
    let app = TestApp::spawn().await;
    let gold = app.tier_id("Gold").await;

    let pinned = app.create_vendor(0, None);
    app.tiers.assign_manual_tier(pinned, gold, None, at(1)).await.unwrap();
    let later = app.create_vendor(0, None);
    app.tiers
        .assign_manual_tier(later, gold, Some(at(20)), at(1))
        .await
        .unwrap();

    let report = app.pricing.sweep_expired_manual_tiers(at(10)).await.unwrap();

    assert_eq!(report.cleared_count, 0);
    assert_eq!(app.store.vendor(pinned).manual_tier_id, Some(gold));
    assert_eq!(app.store.vendor(later).manual_tier_id, Some(gold));
}

#[tokio::test]
async fn expiry_exactly_at_sweep_time_counts_as_expired() {
    let app = TestApp::spawn().await;
    let vendor_id = app.create_vendor(0, None);
    let gold = app.tier_id("Gold").await;
    app.tiers
        .assign_manual_tier(vendor_id, gold, Some(at(10)), at(1))
        .await
        .unwrap();

    let report = app.pricing.sweep_expired_manual_tiers(at(10)).await.unwrap();

    assert_eq!(report.cleared_count, 1);
}

#[tokio::test]
async fn sweep_collects_per_vendor_failures() {
    let app = TestApp::spawn().await;
    let gold = app.tier_id("Gold").await;

    let healthy = app.create_vendor(0, None);
    let broken = app.create_vendor(0, None);
    for vendor_id in [healthy, broken] {
        app.tiers
            .assign_manual_tier(vendor_id, gold, Some(at(5)), at(1))
            .await
            .unwrap();
    }
    app.store.fail_reset_for(broken);

    let report = app.pricing.sweep_expired_manual_tiers(at(10)).await.unwrap();

    assert_eq!(report.cleared_count, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].vendor_id, broken);
    assert_eq!(report.errors[0].message, "pricing store failure: connection reset");
    assert_eq!(app.store.vendor(healthy).manual_tier_id, None);
    assert_eq!(app.store.vendor(broken).manual_tier_id, Some(gold));
}
