// src/engine/manual_tier.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    engine::{error::{PricingError, StoreError}, tier_catalog::TierCatalog, tier_resolver::resolve_automatic_tier},
    models::{
        pricing::{CommissionType, PricingSource, PricingTier},
        vendor::VendorPricingState,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierSource {
    Manual,
    Automatic,
}

impl From<TierSource> for PricingSource {
    fn from(source: TierSource) -> Self {
        match source {
            TierSource::Manual => PricingSource::ManualTier,
            TierSource::Automatic => PricingSource::AutomaticTier,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EffectiveTier<'a> {
    pub tier: &'a PricingTier,
    pub source: TierSource,
}

/// Valor memorizado em `vendors.current_tier_id` / `current_commission_rate`.
///
/// `commission_rate` é o `commission_value` cru do tier: um percentual para
/// tiers `percentage`, um valor absoluto na moeda para tiers `fixed`.
/// `commission_type` diz qual dos dois.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierAssignment {
    pub tier_id: Uuid,
    pub commission_type: CommissionType,
    pub commission_rate: Decimal,
    pub source: TierSource,
}

impl From<EffectiveTier<'_>> for TierAssignment {
    fn from(effective: EffectiveTier<'_>) -> Self {
        Self {
            tier_id: effective.tier.id,
            commission_type: effective.tier.commission_type,
            commission_rate: effective.tier.commission_value,
            source: effective.source,
        }
    }
}

/// Tier manual ainda vigente (expiração nula = indefinido).
pub fn pinned_manual_tier(vendor: &VendorPricingState, now: DateTime<Utc>) -> Option<Uuid> {
    let tier_id = vendor.manual_tier_id?;
    match vendor.manual_tier_expires_at {
        Some(expires_at) if expires_at <= now => None,
        _ => Some(tier_id),
    }
}

pub fn manual_tier_expired(vendor: &VendorPricingState, now: DateTime<Utc>) -> bool {
    vendor.manual_tier_id.is_some()
        && vendor.manual_tier_expires_at.is_some_and(|expires_at| expires_at <= now)
}

/// Tier manual vigente tem precedência; caso contrário, resolução automática.
///
/// Falha com `ManualTierNotFound` se o tier fixado foi desativado; quem chama
/// deve tratar isso caindo para [`automatic_tier`].
pub fn effective_tier<'a>(
    vendor: &VendorPricingState,
    now: DateTime<Utc>,
    tiers: &[&'a PricingTier],
    fallback_name: &str,
) -> Result<EffectiveTier<'a>, PricingError> {
    if let Some(manual_id) = pinned_manual_tier(vendor, now) {
        let tier = tiers
            .iter()
            .find(|t| t.id == manual_id)
            .copied()
            .ok_or(PricingError::ManualTierNotFound(manual_id))?;
        return Ok(EffectiveTier { tier, source: TierSource::Manual });
    }

    automatic_tier(vendor, tiers, fallback_name)
}

pub fn automatic_tier<'a>(
    vendor: &VendorPricingState,
    tiers: &[&'a PricingTier],
    fallback_name: &str,
) -> Result<EffectiveTier<'a>, PricingError> {
    let tier = resolve_automatic_tier(&vendor.metrics(), tiers, fallback_name)?;
    Ok(EffectiveTier { tier, source: TierSource::Automatic })
}

/// Como [`effective_tier`], mas um tier manual órfão vira aviso e cai para o automático.
pub fn effective_tier_or_automatic<'a>(
    vendor: &VendorPricingState,
    now: DateTime<Utc>,
    tiers: &[&'a PricingTier],
    fallback_name: &str,
) -> Result<EffectiveTier<'a>, PricingError> {
    match effective_tier(vendor, now, tiers, fallback_name) {
        Err(err @ PricingError::ManualTierNotFound(_)) => {
            tracing::warn!(vendor_id = %vendor.vendor_id, error = %err, "Tier manual inválido, usando tier automático");
            automatic_tier(vendor, tiers, fallback_name)
        }
        other => other,
    }
}

/// Recalcula a projeção memorizada do tier do vendedor.
pub fn recompute_assignment(
    vendor: &VendorPricingState,
    now: DateTime<Utc>,
    catalog: &TierCatalog,
    fallback_name: &str,
) -> Result<TierAssignment, PricingError> {
    let tiers = catalog.list_active_tiers(now);
    effective_tier_or_automatic(vendor, now, &tiers, fallback_name).map(TierAssignment::from)
}

// =========================================================================
//  VARREDURA DE TIERS MANUAIS EXPIRADOS
// =========================================================================

#[async_trait]
pub trait ManualTierStore: Send + Sync {
    async fn list_tiers(&self) -> Result<Vec<PricingTier>, StoreError>;

    /// Vendedores com `manual_tier_expires_at <= now`.
    async fn vendors_with_expired_manual_tier(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<VendorPricingState>, StoreError>;

    /// Grava o tier automático e limpa os campos manuais de forma atômica,
    /// somente se o tier manual ainda estiver expirado. Retorna `false` se
    /// outra execução já tiver limpado o vendedor.
    async fn reset_to_automatic(
        &self,
        vendor_id: Uuid,
        assignment: TierAssignment,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepError {
    pub vendor_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub cleared_count: usize,
    pub errors: Vec<SweepError>,
}

/// Limpa tiers manuais expirados e recalcula o tier automático de cada vendedor.
///
/// Falhas por vendedor são coletadas e não interrompem a varredura. Rodar de
/// novo sem novas expirações não altera nada.
pub async fn sweep_expired_manual_tiers<S>(
    store: &S,
    now: DateTime<Utc>,
    fallback_name: &str,
) -> Result<SweepReport, StoreError>
where
    S: ManualTierStore + ?Sized,
{
    let catalog = TierCatalog::new(store.list_tiers().await?);
    let tiers = catalog.list_active_tiers(now);
    let expired = store.vendors_with_expired_manual_tier(now).await?;

    let mut report = SweepReport::default();

    for vendor in expired {
        let assignment = match automatic_tier(&vendor, &tiers, fallback_name) {
            Ok(effective) => TierAssignment::from(effective),
            Err(err) => {
                report.errors.push(SweepError { vendor_id: vendor.vendor_id, message: err.to_string() });
                continue;
            }
        };

        match store.reset_to_automatic(vendor.vendor_id, assignment, now).await {
            Ok(true) => {
                tracing::debug!(vendor_id = %vendor.vendor_id, tier_id = %assignment.tier_id, "Tier manual expirado removido");
                report.cleared_count += 1;
            }
            Ok(false) => {}
            Err(err) => {
                report.errors.push(SweepError { vendor_id: vendor.vendor_id, message: err.to_string() });
            }
        }
    }

    tracing::info!(
        cleared = report.cleared_count,
        errors = report.errors.len(),
        "Varredura de tiers manuais expirados concluída"
    );

    Ok(report)
}
