//! Shared harness for the pricing integration tests.
//!
//! Services run against an in-memory `PricingStore`, so no database is needed.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use tourism_pricing::{
    common::error::AppError,
    engine::{
        manual_tier::manual_tier_expired, EngineSettings, ManualTierStore, StoreError, TierAssignment,
    },
    models::{
        booking::Booking,
        pricing::{
            CommissionType, NewPricingTier, NewServicePricingOverride, PaymentBreakdown,
            PricingTier, ServicePricingOverride,
        },
        vendor::{VendorChange, VendorPricingState},
    },
    services::{OverrideService, PricingService, PricingSnapshot, PricingStore, TierService},
};

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

#[derive(Default)]
struct Tables {
    tiers: Vec<PricingTier>,
    overrides: Vec<ServicePricingOverride>,
    vendors: HashMap<Uuid, VendorPricingState>,
    bookings: HashMap<Uuid, Booking>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    // Vendors whose reset fails, to exercise per-vendor sweep errors
    failing_resets: Mutex<Vec<Uuid>>,
}

impl InMemoryStore {
    pub fn vendor(&self, vendor_id: Uuid) -> VendorPricingState {
        self.tables.lock().unwrap().vendors[&vendor_id].clone()
    }

    pub fn booking(&self, booking_id: Uuid) -> Booking {
        self.tables.lock().unwrap().bookings[&booking_id].clone()
    }

    pub fn put_vendor(&self, vendor: VendorPricingState) {
        self.tables.lock().unwrap().vendors.insert(vendor.vendor_id, vendor);
    }

    pub fn put_booking(&self, booking: Booking) {
        self.tables.lock().unwrap().bookings.insert(booking.id, booking);
    }

    pub fn fail_reset_for(&self, vendor_id: Uuid) {
        self.failing_resets.lock().unwrap().push(vendor_id);
    }
}

#[async_trait]
impl ManualTierStore for InMemoryStore {
    async fn list_tiers(&self) -> Result<Vec<PricingTier>, StoreError> {
        Ok(self.tables.lock().unwrap().tiers.clone())
    }

    async fn vendors_with_expired_manual_tier(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<VendorPricingState>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .vendors
            .values()
            .filter(|v| manual_tier_expired(v, now))
            .cloned()
            .collect())
    }

    async fn reset_to_automatic(
        &self,
        vendor_id: Uuid,
        assignment: TierAssignment,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if self.failing_resets.lock().unwrap().contains(&vendor_id) {
            return Err(StoreError::new("connection reset"));
        }

        let mut tables = self.tables.lock().unwrap();
        let Some(vendor) = tables.vendors.get_mut(&vendor_id) else {
            return Ok(false);
        };
        if !manual_tier_expired(vendor, now) {
            return Ok(false);
        }

        vendor.manual_tier_id = None;
        vendor.manual_tier_expires_at = None;
        vendor.current_tier_id = Some(assignment.tier_id);
        vendor.current_commission_rate = assignment.commission_rate;
        Ok(true)
    }
}

#[async_trait]
impl PricingStore for InMemoryStore {
    async fn pricing_snapshot(
        &self,
        service_id: Uuid,
        vendor_id: Uuid,
    ) -> Result<PricingSnapshot, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(PricingSnapshot {
            tiers: tables.tiers.clone(),
            overrides: tables
                .overrides
                .iter()
                .filter(|o| o.service_id == service_id)
                .cloned()
                .collect(),
            vendor: tables.vendors.get(&vendor_id).cloned(),
        })
    }

    async fn get_tier(&self, id: Uuid) -> Result<Option<PricingTier>, AppError> {
        Ok(self.tables.lock().unwrap().tiers.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_tier(&self, input: &NewPricingTier) -> Result<PricingTier, AppError> {
        let tier = PricingTier {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            commission_type: input.commission_type,
            commission_value: input.commission_value,
            min_monthly_bookings: input.min_monthly_bookings,
            min_rating: input.min_rating,
            priority_order: input.priority_order,
            effective_from: input.effective_from,
            effective_until: input.effective_until,
            is_active: true,
        };
        self.tables.lock().unwrap().tiers.push(tier.clone());
        Ok(tier)
    }

    async fn update_tier(&self, tier: &PricingTier) -> Result<PricingTier, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .tiers
            .iter_mut()
            .find(|t| t.id == tier.id)
            .ok_or(AppError::TierNotFound(tier.id))?;
        *slot = tier.clone();
        Ok(tier.clone())
    }

    async fn deactivate_tier(&self, id: Uuid) -> Result<Option<PricingTier>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.tiers.iter_mut().find(|t| t.id == id).map(|t| {
            t.is_active = false;
            t.clone()
        }))
    }

    async fn list_overrides_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<ServicePricingOverride>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut overrides: Vec<_> = tables
            .overrides
            .iter()
            .filter(|o| o.service_id == service_id)
            .cloned()
            .collect();
        overrides.sort_by(|a, b| b.effective_from.cmp(&a.effective_from));
        Ok(overrides)
    }

    async fn insert_override(
        &self,
        input: &NewServicePricingOverride,
    ) -> Result<ServicePricingOverride, AppError> {
        let created = ServicePricingOverride {
            id: Uuid::new_v4(),
            service_id: input.service_id,
            override_enabled: true,
            override_type: input.override_type,
            override_value: input.override_value,
            fee_payer: input.fee_payer,
            tourist_percentage: input.tourist_percentage,
            vendor_percentage: input.vendor_percentage,
            effective_from: input.effective_from,
            effective_until: input.effective_until,
            created_by: input.created_by.clone(),
        };
        self.tables.lock().unwrap().overrides.push(created.clone());
        Ok(created)
    }

    async fn disable_override(&self, id: Uuid) -> Result<Option<ServicePricingOverride>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.overrides.iter_mut().find(|o| o.id == id).map(|o| {
            o.override_enabled = false;
            o.clone()
        }))
    }

    async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<VendorPricingState>, AppError> {
        Ok(self.tables.lock().unwrap().vendors.get(&vendor_id).cloned())
    }

    async fn apply_vendor_change(
        &self,
        vendor_id: Uuid,
        change: &VendorChange,
    ) -> Result<Option<VendorPricingState>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(vendor) = tables.vendors.get_mut(&vendor_id) else {
            return Ok(None);
        };
        match change {
            VendorChange::Metrics(metrics) => {
                vendor.monthly_booking_count = metrics.monthly_booking_count;
                vendor.average_rating = metrics.average_rating;
            }
            VendorChange::AssignManualTier { tier_id, expires_at } => {
                vendor.manual_tier_id = Some(*tier_id);
                vendor.manual_tier_expires_at = *expires_at;
            }
            VendorChange::ClearManualTier => {
                vendor.manual_tier_id = None;
                vendor.manual_tier_expires_at = None;
            }
        }
        Ok(Some(vendor.clone()))
    }

    async fn save_tier_assignment(
        &self,
        computed_from: &VendorPricingState,
        assignment: TierAssignment,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(vendor) = tables.vendors.get_mut(&computed_from.vendor_id) else {
            return Ok(false);
        };
        let unchanged = vendor.monthly_booking_count == computed_from.monthly_booking_count
            && vendor.average_rating == computed_from.average_rating
            && vendor.manual_tier_id == computed_from.manual_tier_id
            && vendor.manual_tier_expires_at == computed_from.manual_tier_expires_at;
        if !unchanged {
            return Ok(false);
        }

        vendor.current_tier_id = Some(assignment.tier_id);
        vendor.current_commission_rate = assignment.commission_rate;
        Ok(true)
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError> {
        Ok(self.tables.lock().unwrap().bookings.get(&booking_id).cloned())
    }

    async fn freeze_booking_pricing(
        &self,
        booking_id: Uuid,
        breakdown: &PaymentBreakdown,
        priced_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(booking) = tables.bookings.get_mut(&booking_id) else {
            return Ok(false);
        };
        if booking.priced_at.is_some() {
            return Ok(false);
        }

        booking.total_amount = Some(breakdown.tourist_total_amount);
        booking.commission_rate_at_booking = Some(breakdown.commission_rate);
        booking.commission_amount = Some(breakdown.commission_amount);
        booking.vendor_payout_amount = Some(breakdown.vendor_payout_amount);
        booking.tourist_fee_share = Some(breakdown.tourist_fee_share);
        booking.vendor_fee_share = Some(breakdown.vendor_fee_share);
        booking.pricing_source = Some(breakdown.source);
        booking.priced_at = Some(priced_at);
        Ok(true)
    }
}

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub pricing: PricingService,
    pub tiers: TierService,
    pub overrides: OverrideService,
}

impl TestApp {
    /// Store with the four standard tiers: Bronze, Silver, Gold, Platinum.
    pub async fn spawn() -> Self {
        let app = Self::empty();
        for (name, priority, min_bookings, min_rating, rate) in [
            ("Bronze", 4, 0, None, dec!(12)),
            ("Silver", 3, 10, Some(dec!(4.0)), dec!(10)),
            ("Gold", 2, 25, Some(dec!(4.5)), dec!(8)),
            ("Platinum", 1, 50, Some(dec!(4.8)), dec!(5)),
        ] {
            app.store
                .insert_tier(&NewPricingTier {
                    name: name.to_string(),
                    commission_type: CommissionType::Percentage,
                    commission_value: rate,
                    min_monthly_bookings: min_bookings,
                    min_rating,
                    priority_order: priority,
                    effective_from: at(1) - chrono::Duration::days(365),
                    effective_until: None,
                })
                .await
                .expect("Failed to seed tier");
        }
        app
    }

    pub fn empty() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let dyn_store: Arc<dyn PricingStore> = store.clone();
        let settings = EngineSettings::default();

        Self {
            pricing: PricingService::new(dyn_store.clone(), settings.clone()),
            tiers: TierService::new(dyn_store.clone(), settings),
            overrides: OverrideService::new(dyn_store),
            store,
        }
    }

    pub async fn tier_id(&self, name: &str) -> Uuid {
        self.store
            .list_tiers()
            .await
            .unwrap()
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .expect("Missing tier")
    }

    pub fn create_vendor(&self, bookings: i32, rating: Option<Decimal>) -> Uuid {
        let vendor_id = Uuid::new_v4();
        self.store.put_vendor(VendorPricingState {
            vendor_id,
            monthly_booking_count: bookings,
            average_rating: rating,
            current_tier_id: None,
            current_commission_rate: Decimal::ZERO,
            manual_tier_id: None,
            manual_tier_expires_at: None,
        });
        vendor_id
    }

    pub fn create_booking(&self, vendor_id: Uuid, service_id: Uuid, gross: Decimal) -> Uuid {
        let booking_id = Uuid::new_v4();
        self.store.put_booking(Booking {
            id: booking_id,
            service_id,
            vendor_id,
            gross_amount: gross,
            total_amount: None,
            commission_rate_at_booking: None,
            commission_amount: None,
            vendor_payout_amount: None,
            tourist_fee_share: None,
            vendor_fee_share: None,
            pricing_source: None,
            priced_at: None,
        });
        booking_id
    }
}
