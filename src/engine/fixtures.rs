// src/engine/fixtures.rs

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::models::{
    pricing::{CommissionType, FeePayer, PricingTier, ServicePricingOverride},
    vendor::VendorPricingState,
};

pub const DEFAULT: &str = crate::engine::tier_resolver::DEFAULT_FALLBACK_TIER;

pub fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, n, 12, 0, 0).unwrap()
}

pub fn tier(name: &str, priority: i32, min_bookings: i32, min_rating: Option<Decimal>, rate: Decimal) -> PricingTier {
    PricingTier {
        id: Uuid::new_v4(),
        name: name.to_string(),
        commission_type: CommissionType::Percentage,
        commission_value: rate,
        min_monthly_bookings: min_bookings,
        min_rating,
        priority_order: priority,
        effective_from: day(1) - chrono::Duration::days(365),
        effective_until: None,
        is_active: true,
    }
}

// Platinum > Gold > Silver > Bronze
pub fn standard_tiers() -> Vec<PricingTier> {
    vec![
        tier("Bronze", 4, 0, None, dec!(12)),
        tier("Silver", 3, 10, Some(dec!(4.0)), dec!(10)),
        tier("Gold", 2, 25, Some(dec!(4.5)), dec!(8)),
        tier("Platinum", 1, 50, Some(dec!(4.8)), dec!(5)),
    ]
}

pub fn named<'a>(tiers: &'a [PricingTier], name: &str) -> &'a PricingTier {
    tiers.iter().find(|t| t.name == name).unwrap()
}

pub fn vendor(bookings: i32, rating: Option<Decimal>) -> VendorPricingState {
    VendorPricingState {
        vendor_id: Uuid::new_v4(),
        monthly_booking_count: bookings,
        average_rating: rating,
        current_tier_id: None,
        current_commission_rate: Decimal::ZERO,
        manual_tier_id: None,
        manual_tier_expires_at: None,
    }
}

pub fn percentage_override(service_id: Uuid, value: Decimal, payer: FeePayer, from: DateTime<Utc>) -> ServicePricingOverride {
    ServicePricingOverride {
        id: Uuid::new_v4(),
        service_id,
        override_enabled: true,
        override_type: CommissionType::Percentage,
        override_value: value,
        fee_payer: payer,
        tourist_percentage: None,
        vendor_percentage: None,
        effective_from: from,
        effective_until: None,
        created_by: "ops@tourism.app".to_string(),
    }
}
