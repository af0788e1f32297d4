//! Service override administration tests.

mod common;

use common::{at, TestApp};
use rust_decimal_macros::dec;
use tourism_pricing::{
    common::error::AppError,
    engine::PricingError,
    models::pricing::{CommissionType, FeePayer, NewServicePricingOverride},
};
use uuid::Uuid;

fn override_input(service_id: Uuid, payer: FeePayer) -> NewServicePricingOverride {
    NewServicePricingOverride {
        service_id,
        override_type: CommissionType::Percentage,
        override_value: dec!(15),
        fee_payer: payer,
        tourist_percentage: None,
        vendor_percentage: None,
        effective_from: at(1),
        effective_until: Some(at(20)),
        created_by: "ops@tourism.app".to_string(),
    }
}

#[tokio::test]
async fn create_override_records_auditor() {
    let app = TestApp::spawn().await;
    let service_id = Uuid::new_v4();

    let created = app
        .overrides
        .create_override(override_input(service_id, FeePayer::Tourist))
        .await
        .expect("Failed to create override");

    assert!(created.override_enabled);
    assert_eq!(created.created_by, "ops@tourism.app");

    let listed = app.overrides.list_for_service(service_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
}

#[tokio::test]
async fn shared_split_must_sum_to_hundred() {
    let app = TestApp::spawn().await;
    let mut input = override_input(Uuid::new_v4(), FeePayer::Shared);
    input.tourist_percentage = Some(dec!(30));
    input.vendor_percentage = Some(dec!(60));

    let result = app.overrides.create_override(input).await;

    assert!(matches!(
        result,
        Err(AppError::Pricing(PricingError::MisconfiguredSharedSplit { .. }))
    ));
}

#[tokio::test]
async fn shared_split_requires_both_percentages() {
    let app = TestApp::spawn().await;
    let mut input = override_input(Uuid::new_v4(), FeePayer::Shared);
    input.tourist_percentage = Some(dec!(100));

    let result = app.overrides.create_override(input).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn override_window_must_be_ordered() {
    let app = TestApp::spawn().await;
    let mut input = override_input(Uuid::new_v4(), FeePayer::Vendor);
    input.effective_until = Some(at(1));

    let result = app.overrides.create_override(input).await;

    assert!(matches!(
        result,
        Err(AppError::Pricing(PricingError::InvalidOverride(_)))
    ));
}

#[tokio::test]
async fn disable_unknown_override_is_not_found() {
    let app = TestApp::spawn().await;

    let result = app.overrides.disable_override(Uuid::new_v4()).await;

    assert!(matches!(result, Err(AppError::OverrideNotFound(_))));
}
