// src/services/tier_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    engine::{recompute_assignment, EngineSettings, PricingError, TierAssignment, TierCatalog},
    models::{
        pricing::{NewPricingTier, PricingTier, UpdatePricingTier},
        vendor::{VendorChange, VendorMetrics, VendorPricingState, VendorTierView},
    },
    services::pricing_store::PricingStore,
};

#[derive(Clone)]
pub struct TierService {
    store: Arc<dyn PricingStore>,
    settings: EngineSettings,
}

impl TierService {
    pub fn new(store: Arc<dyn PricingStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    async fn catalog(&self) -> Result<TierCatalog, AppError> {
        Ok(TierCatalog::new(self.store.list_tiers().await?))
    }

    // =========================================================================
    //  CATÁLOGO (Painel administrativo)
    // =========================================================================

    pub async fn list_active_tiers(&self, now: DateTime<Utc>) -> Result<Vec<PricingTier>, AppError> {
        let catalog = self.catalog().await?;
        Ok(catalog.list_active_tiers(now).into_iter().cloned().collect())
    }

    pub async fn create_tier(
        &self,
        input: NewPricingTier,
    ) -> Result<PricingTier, AppError> {
        let candidate = PricingTier {
            id: Uuid::nil(),
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
        candidate.validate()?;
        self.ensure_priority_free(&candidate).await?;

        let tier = self.store.insert_tier(&input).await?;
        tracing::info!(tier_id = %tier.id, name = %tier.name, "Tier de comissão criado");
        Ok(tier)
    }

    pub async fn update_tier(
        &self,
        id: Uuid,
        changes: UpdatePricingTier,
    ) -> Result<PricingTier, AppError> {
        let mut tier = self.store.get_tier(id).await?.ok_or(AppError::TierNotFound(id))?;

        if let Some(name) = changes.name {
            tier.name = name;
        }
        if let Some(kind) = changes.commission_type {
            tier.commission_type = kind;
        }
        if let Some(value) = changes.commission_value {
            tier.commission_value = value;
        }
        if let Some(min) = changes.min_monthly_bookings {
            tier.min_monthly_bookings = min;
        }
        if let Some(rating) = changes.min_rating {
            tier.min_rating = rating;
        }
        if let Some(priority) = changes.priority_order {
            tier.priority_order = priority;
        }
        if let Some(until) = changes.effective_until {
            tier.effective_until = until;
        }

        tier.validate()?;
        self.ensure_priority_free(&tier).await?;

        self.store.update_tier(&tier).await
    }

    /// Tiers nunca são apagados; reservas antigas continuam apontando para eles.
    pub async fn deactivate_tier(&self, id: Uuid) -> Result<PricingTier, AppError> {
        let tier = self
            .store
            .deactivate_tier(id)
            .await?
            .ok_or(AppError::TierNotFound(id))?;

        tracing::info!(tier_id = %id, name = %tier.name, "Tier de comissão desativado");
        Ok(tier)
    }

    // A prioridade define a ordem total entre os tiers ativos
    // Vale para qualquer tier ativo, inclusive os agendados para o futuro
    async fn ensure_priority_free(&self, tier: &PricingTier) -> Result<(), AppError> {
        let catalog = self.catalog().await?;
        let clash = catalog
            .all()
            .iter()
            .any(|t| t.is_active && t.id != tier.id && t.priority_order == tier.priority_order);

        if clash {
            return Err(AppError::DuplicateTierPriority(tier.priority_order));
        }
        Ok(())
    }

    // =========================================================================
    //  TIER DO VENDEDOR
    // =========================================================================

    async fn vendor(&self, vendor_id: Uuid) -> Result<VendorPricingState, AppError> {
        self.store
            .get_vendor(vendor_id)
            .await?
            .ok_or(AppError::VendorNotFound(vendor_id))
    }

    pub async fn effective_tier(
        &self,
        vendor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<VendorTierView, AppError> {
        let vendor = self.vendor(vendor_id).await?;
        let catalog = self.catalog().await?;
        let assignment = recompute_assignment(&vendor, now, &catalog, &self.settings.fallback_tier_name)?;
        self.view(&vendor, assignment, &catalog)
    }

    pub async fn assign_manual_tier(
        &self,
        vendor_id: Uuid,
        tier_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<VendorTierView, AppError> {
        if expires_at.is_some_and(|at| at <= now) {
            return Err(PricingError::InvalidTier("manual tier expiry must be in the future".into()).into());
        }

        let catalog = self.catalog().await?;
        if catalog.find_active(tier_id, now).is_none() {
            return Err(AppError::TierNotFound(tier_id));
        }

        tracing::info!(%vendor_id, %tier_id, expires_at = ?expires_at, "Tier manual atribuído");
        let change = VendorChange::AssignManualTier { tier_id, expires_at };
        self.apply(vendor_id, &change, &catalog, now).await
    }

    pub async fn clear_manual_tier(
        &self,
        vendor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<VendorTierView, AppError> {
        let catalog = self.catalog().await?;
        self.apply(vendor_id, &VendorChange::ClearManualTier, &catalog, now).await
    }

    pub async fn update_metrics(
        &self,
        vendor_id: Uuid,
        metrics: VendorMetrics,
        now: DateTime<Utc>,
    ) -> Result<VendorTierView, AppError> {
        let catalog = self.catalog().await?;
        self.apply(vendor_id, &VendorChange::Metrics(metrics), &catalog, now).await
    }

    // Grava só as colunas da mudança e depois recalcula o tier memorizado a
    // partir da linha devolvida. A projeção é um compare-and-set: se outra
    // escrita mudou as entradas no meio, ela mesma grava a sua projeção.
    async fn apply(
        &self,
        vendor_id: Uuid,
        change: &VendorChange,
        catalog: &TierCatalog,
        now: DateTime<Utc>,
    ) -> Result<VendorTierView, AppError> {
        if catalog.list_active_tiers(now).is_empty() {
            return Err(PricingError::NoTiersConfigured.into());
        }

        let vendor = self
            .store
            .apply_vendor_change(vendor_id, change)
            .await?
            .ok_or(AppError::VendorNotFound(vendor_id))?;

        let assignment = recompute_assignment(&vendor, now, catalog, &self.settings.fallback_tier_name)?;
        if !self.store.save_tier_assignment(&vendor, assignment).await? {
            tracing::debug!(%vendor_id, "Vendedor alterado em paralelo, projeção de tier mantida pela outra escrita");
        }

        self.view(&vendor, assignment, catalog)
    }

    fn view(
        &self,
        vendor: &VendorPricingState,
        assignment: TierAssignment,
        catalog: &TierCatalog,
    ) -> Result<VendorTierView, AppError> {
        let tier = catalog
            .find(assignment.tier_id)
            .ok_or(AppError::TierNotFound(assignment.tier_id))?;

        Ok(VendorTierView {
            vendor_id: vendor.vendor_id,
            tier_id: tier.id,
            tier_name: tier.name.clone(),
            commission_type: assignment.commission_type,
            commission_rate: assignment.commission_rate,
            source: assignment.source.into(),
            manual_tier_expires_at: vendor.manual_tier_expires_at,
        })
    }
}
