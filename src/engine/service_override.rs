// src/engine/service_override.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::{
    engine::error::PricingError,
    models::pricing::{CommissionType, FeePayer, ServicePricingOverride},
};

const SPLIT_TOLERANCE: Decimal = dec!(0.001);

impl ServicePricingOverride {
    /// Habilitado e com `effective_from <= now <= effective_until`.
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.override_enabled
            && self.effective_from <= now
            && self.effective_until.is_none_or(|until| until >= now)
    }

    /// Percentuais (turista, vendedor) de um rateio `shared`.
    pub fn shared_split(&self) -> Result<(Decimal, Decimal), PricingError> {
        let tourist = self.tourist_percentage.unwrap_or(Decimal::ZERO);
        let vendor = self.vendor_percentage.unwrap_or(Decimal::ZERO);

        let in_range = |p: Decimal| p >= Decimal::ZERO && p <= dec!(100);
        let sums_to_hundred = (tourist + vendor - dec!(100)).abs() <= SPLIT_TOLERANCE;

        if self.tourist_percentage.is_none()
            || self.vendor_percentage.is_none()
            || !in_range(tourist)
            || !in_range(vendor)
            || !sums_to_hundred
        {
            return Err(PricingError::MisconfiguredSharedSplit { tourist, vendor });
        }
        Ok((tourist, vendor))
    }

    /// Regras de escrita do painel administrativo.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.override_value < Decimal::ZERO {
            return Err(PricingError::InvalidOverride("override value must not be negative".into()));
        }
        if self.override_type == CommissionType::Percentage && self.override_value > dec!(100) {
            return Err(PricingError::InvalidOverride("percentage override must be at most 100".into()));
        }
        if let Some(until) = self.effective_until {
            if until <= self.effective_from {
                return Err(PricingError::InvalidOverride("effective_until must be after effective_from".into()));
            }
        }
        if self.fee_payer == FeePayer::Shared {
            self.shared_split()?;
        }
        Ok(())
    }
}

/// Override vigente de um serviço: o de `effective_from` mais recente.
///
/// Empates no `effective_from` são resolvidos pelo maior `id` e logados como
/// `OverrideAmbiguous`, porque indicam erro de cadastro.
pub fn active_override_for(
    overrides: &[ServicePricingOverride],
    service_id: Uuid,
    now: DateTime<Utc>,
) -> Option<&ServicePricingOverride> {
    let mut candidates: Vec<&ServicePricingOverride> = overrides
        .iter()
        .filter(|o| o.service_id == service_id && o.is_effective_at(now))
        .collect();

    candidates.sort_by(|a, b| {
        b.effective_from
            .cmp(&a.effective_from)
            .then_with(|| b.id.cmp(&a.id))
    });

    let chosen = *candidates.first()?;
    let tied = candidates
        .iter()
        .filter(|o| o.effective_from == chosen.effective_from)
        .count();

    if tied > 1 {
        let err = PricingError::OverrideAmbiguous { service_id, candidates: tied };
        tracing::warn!(%service_id, override_id = %chosen.id, error = %err, "Override escolhido por desempate de id");
    }

    Some(chosen)
}
