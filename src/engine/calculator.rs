// src/engine/calculator.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    engine::{
        error::PricingError,
        manual_tier::{effective_tier_or_automatic, TierSource},
        money::{fee_for, fits_minor_units, percent_of, round_money},
        service_override::active_override_for,
        tier_catalog::TierCatalog,
        tier_resolver::DEFAULT_FALLBACK_TIER,
    },
    models::{
        pricing::{
            CommissionType, FeePayer, PaymentBreakdown, PricingSource, PricingTier,
            ServicePricingOverride,
        },
        vendor::VendorPricingState,
    },
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Casas decimais da moeda (IDR = 0, USD = 2).
    pub minor_units: u32,
    pub fallback_tier_name: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            minor_units: 0,
            fallback_tier_name: DEFAULT_FALLBACK_TIER.to_string(),
        }
    }
}

// Ordem de precedência: override do serviço > tier manual > tier automático
enum PricingDecision<'a> {
    ServiceOverride(&'a ServicePricingOverride),
    ManualTier(&'a PricingTier),
    AutomaticTier(&'a PricingTier),
}

/// Snapshot consistente de tiers e overrides lido no momento da reserva.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: TierCatalog,
    overrides: Vec<ServicePricingOverride>,
    settings: EngineSettings,
}

impl PricingEngine {
    pub fn new(
        tiers: Vec<PricingTier>,
        overrides: Vec<ServicePricingOverride>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog: TierCatalog::new(tiers),
            overrides,
            settings,
        }
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    pub fn compute_payment(
        &self,
        gross_amount: Decimal,
        service_id: Uuid,
        vendor: &VendorPricingState,
        now: DateTime<Utc>,
    ) -> Result<PaymentBreakdown, PricingError> {
        // Mais casas que a moeda exigiria arredondar o bruto em silêncio
        if gross_amount <= Decimal::ZERO || !fits_minor_units(gross_amount, self.settings.minor_units) {
            return Err(PricingError::InvalidGrossAmount(gross_amount));
        }

        let tiers = self.catalog.list_active_tiers(now);
        let decision = match active_override_for(&self.overrides, service_id, now) {
            Some(o) => PricingDecision::ServiceOverride(o),
            None => {
                let effective = effective_tier_or_automatic(
                    vendor,
                    now,
                    &tiers,
                    &self.settings.fallback_tier_name,
                )?;
                match effective.source {
                    TierSource::Manual => PricingDecision::ManualTier(effective.tier),
                    TierSource::Automatic => PricingDecision::AutomaticTier(effective.tier),
                }
            }
        };

        match decision {
            PricingDecision::ServiceOverride(o) => {
                let tourist_pct = match o.fee_payer {
                    FeePayer::Shared => o.shared_split()?.0,
                    FeePayer::Tourist => dec!(100),
                    FeePayer::Platform | FeePayer::Vendor => Decimal::ZERO,
                };
                let mut breakdown = self.settle(
                    gross_amount,
                    o.override_type,
                    o.override_value,
                    o.fee_payer,
                    tourist_pct,
                    PricingSource::ServiceOverride,
                )?;
                breakdown.override_id = Some(o.id);
                Ok(breakdown)
            }
            PricingDecision::ManualTier(tier) => {
                self.settle_tier(gross_amount, tier, PricingSource::ManualTier)
            }
            PricingDecision::AutomaticTier(tier) => {
                self.settle_tier(gross_amount, tier, PricingSource::AutomaticTier)
            }
        }
    }

    // Fluxo padrão: a plataforma retira a comissão do repasse ao vendedor
    fn settle_tier(
        &self,
        gross: Decimal,
        tier: &PricingTier,
        source: PricingSource,
    ) -> Result<PaymentBreakdown, PricingError> {
        let mut breakdown = self.settle(
            gross,
            tier.commission_type,
            tier.commission_value,
            FeePayer::Vendor,
            Decimal::ZERO,
            source,
        )?;
        breakdown.tier_id = Some(tier.id);
        Ok(breakdown)
    }

    fn settle(
        &self,
        gross: Decimal,
        kind: CommissionType,
        value: Decimal,
        fee_payer: FeePayer,
        tourist_pct: Decimal,
        source: PricingSource,
    ) -> Result<PaymentBreakdown, PricingError> {
        let minor_units = self.settings.minor_units;
        // Aritmética checada: um bruto absurdo vira erro, não pânico
        let out_of_range = || PricingError::InvalidGrossAmount(gross);

        let raw_fee = fee_for(gross, kind, value).ok_or_else(out_of_range)?;
        let commission_amount = round_money(raw_fee, minor_units);
        let tourist_fee_share = round_money(
            percent_of(raw_fee, tourist_pct).ok_or_else(out_of_range)?,
            minor_units,
        );
        let vendor_fee_share = commission_amount
            .checked_sub(tourist_fee_share)
            .ok_or_else(out_of_range)?;

        let vendor_payout_amount = gross.checked_sub(vendor_fee_share).ok_or_else(out_of_range)?;
        if vendor_payout_amount < Decimal::ZERO {
            return Err(PricingError::FeeExceedsGrossAmount { fee: vendor_fee_share, gross });
        }
        let tourist_total_amount = gross.checked_add(tourist_fee_share).ok_or_else(out_of_range)?;

        let commission_rate = match kind {
            CommissionType::Percentage => value,
            CommissionType::Fixed => commission_amount
                .checked_div(gross)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .ok_or_else(out_of_range)?
                .round_dp(4),
        };

        Ok(PaymentBreakdown {
            gross_amount: gross,
            commission_type: kind,
            commission_rate,
            commission_amount,
            vendor_payout_amount,
            tourist_total_amount,
            tourist_fee_share,
            vendor_fee_share,
            fee_payer,
            source,
            tier_id: None,
            override_id: None,
        })
    }
}
