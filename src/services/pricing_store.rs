// src/services/pricing_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    engine::{ManualTierStore, TierAssignment},
    models::{
        booking::Booking,
        pricing::{
            NewPricingTier, NewServicePricingOverride, PaymentBreakdown, PricingTier,
            ServicePricingOverride,
        },
        vendor::{VendorChange, VendorPricingState},
    },
};

/// Tudo que o cálculo de uma reserva precisa, lido de uma vez só.
#[derive(Debug, Clone)]
pub struct PricingSnapshot {
    pub tiers: Vec<PricingTier>,
    pub overrides: Vec<ServicePricingOverride>,
    pub vendor: Option<VendorPricingState>,
}

// Persistência usada pelos serviços. A implementação de produção é o
// PgPricingStore; os testes usam uma versão em memória.
#[async_trait]
pub trait PricingStore: ManualTierStore {
    async fn pricing_snapshot(
        &self,
        service_id: Uuid,
        vendor_id: Uuid,
    ) -> Result<PricingSnapshot, AppError>;

    // --- Tiers ---
    async fn get_tier(&self, id: Uuid) -> Result<Option<PricingTier>, AppError>;
    async fn insert_tier(&self, tier: &NewPricingTier) -> Result<PricingTier, AppError>;
    async fn update_tier(&self, tier: &PricingTier) -> Result<PricingTier, AppError>;
    async fn deactivate_tier(&self, id: Uuid) -> Result<Option<PricingTier>, AppError>;

    // --- Overrides ---
    async fn list_overrides_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<ServicePricingOverride>, AppError>;
    async fn insert_override(
        &self,
        input: &NewServicePricingOverride,
    ) -> Result<ServicePricingOverride, AppError>;
    async fn disable_override(&self, id: Uuid) -> Result<Option<ServicePricingOverride>, AppError>;

    // --- Vendedores ---
    async fn get_vendor(&self, vendor_id: Uuid) -> Result<Option<VendorPricingState>, AppError>;

    /// Aplica a mudança de forma atômica e devolve a linha resultante.
    async fn apply_vendor_change(
        &self,
        vendor_id: Uuid,
        change: &VendorChange,
    ) -> Result<Option<VendorPricingState>, AppError>;

    /// Grava o tier memorizado só se as entradas do cálculo (métricas e
    /// tier manual) ainda forem as de `computed_from`. `false` quando outra
    /// escrita chegou antes; essa escrita grava a própria projeção.
    async fn save_tier_assignment(
        &self,
        computed_from: &VendorPricingState,
        assignment: TierAssignment,
    ) -> Result<bool, AppError>;

    // --- Reservas ---
    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError>;

    /// Grava a comissão uma única vez; `false` se a reserva já estava precificada.
    async fn freeze_booking_pricing(
        &self,
        booking_id: Uuid,
        breakdown: &PaymentBreakdown,
        priced_at: DateTime<Utc>,
    ) -> Result<bool, AppError>;
}
