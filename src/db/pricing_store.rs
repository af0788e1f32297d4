// src/db/pricing_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, OverrideRepository, TierRepository, VendorRepository},
    engine::{ManualTierStore, StoreError, TierAssignment},
    models::{
        booking::Booking,
        pricing::{
            NewPricingTier, NewServicePricingOverride, PaymentBreakdown, PricingTier,
            ServicePricingOverride,
        },
        vendor::{VendorChange, VendorPricingState},
    },
    services::pricing_store::{PricingSnapshot, PricingStore},
};

// Implementação Postgres do armazenamento usado pelos serviços de precificação
#[derive(Clone)]
pub struct PgPricingStore {
    pool: PgPool,
    tiers: TierRepository,
    overrides: OverrideRepository,
    vendors: VendorRepository,
    bookings: BookingRepository,
}

impl PgPricingStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tiers: TierRepository::new(),
            overrides: OverrideRepository::new(),
            vendors: VendorRepository::new(),
            bookings: BookingRepository::new(),
        }
    }
}

#[async_trait]
impl ManualTierStore for PgPricingStore {
    async fn list_tiers(&self) -> Result<Vec<PricingTier>, StoreError> {
        self.tiers.list_all(&self.pool).await.map_err(StoreError::new)
    }

    async fn vendors_with_expired_manual_tier(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<VendorPricingState>, StoreError> {
        self.vendors
            .list_expired_manual_tiers(&self.pool, now)
            .await
            .map_err(StoreError::new)
    }

    async fn reset_to_automatic(
        &self,
        vendor_id: Uuid,
        assignment: TierAssignment,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        // Um único UPDATE condicional: atômico por linha
        self.vendors
            .reset_expired_manual_tier(
                &self.pool,
                vendor_id,
                assignment.tier_id,
                assignment.commission_rate,
                now,
            )
            .await
            .map_err(StoreError::new)
    }
}

#[async_trait]
impl PricingStore for PgPricingStore {
    async fn pricing_snapshot(
        &self,
        service_id: Uuid,
        vendor_id: Uuid,
    ) -> Result<PricingSnapshot, AppError> {
        // 1. Snapshot consistente: as três leituras enxergam o mesmo estado
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        // 2. Lê tiers, overrides do serviço e o estado do vendedor
        let tiers = self.tiers.list_all(&mut *tx).await?;
        let overrides = self.overrides.list_for_service(&mut *tx, service_id).await?;
        let vendor = self.vendors.find_by_id(&mut *tx, vendor_id).await?;

        tx.commit().await?;

        Ok(PricingSnapshot { tiers, overrides, vendor })
    }

    async fn get_tier(&self, id: Uuid) -> Result<Option<PricingTier>, AppError> {
        self.tiers.find_by_id(&self.pool, id).await
    }

    async fn insert_tier(&self, tier: &NewPricingTier) -> Result<PricingTier, AppError> {
        self.tiers.create(&self.pool, tier).await
    }

    async fn update_tier(&self, tier: &PricingTier) -> Result<PricingTier, AppError> {
        self.tiers.update(&self.pool, tier).await
    }

    async fn deactivate_tier(&self, id: Uuid) -> Result<Option<PricingTier>, AppError> {
        self.tiers.deactivate(&self.pool, id).await
    }

    async fn list_overrides_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<ServicePricingOverride>, AppError> {
        self.overrides.list_for_service(&self.pool, service_id).await
    }

    async fn insert_override(
        &self,
        input: &NewServicePricingOverride,
    ) -> Result<ServicePricingOverride, AppError> {
        self.overrides.create(&self.pool, input).await
    }

    async fn disable_override(&self, id: Uuid) -> Result<Option<ServicePricingOverride>, AppError> {
        self.overrides.disable(&self.pool, id).await
    }

    async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<VendorPricingState>, AppError> {
        self.vendors.find_by_id(&self.pool, vendor_id).await
    }

    async fn apply_vendor_change(
        &self,
        vendor_id: Uuid,
        change: &VendorChange,
    ) -> Result<Option<VendorPricingState>, AppError> {
        self.vendors.apply_change(&self.pool, vendor_id, change).await
    }

    async fn save_tier_assignment(
        &self,
        computed_from: &VendorPricingState,
        assignment: TierAssignment,
    ) -> Result<bool, AppError> {
        self.vendors
            .save_assignment(&self.pool, computed_from, assignment.tier_id, assignment.commission_rate)
            .await
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError> {
        self.bookings.find_by_id(&self.pool, booking_id).await
    }

    async fn freeze_booking_pricing(
        &self,
        booking_id: Uuid,
        breakdown: &PaymentBreakdown,
        priced_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        self.bookings
            .freeze_pricing(&self.pool, booking_id, breakdown, priced_at)
            .await
    }
}
