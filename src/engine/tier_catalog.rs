// src/engine/tier_catalog.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    engine::error::PricingError,
    models::pricing::{CommissionType, PricingTier},
};

pub const MAX_RATING: Decimal = dec!(5);

impl PricingTier {
    /// Regras de escrita do painel administrativo.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.name.trim().is_empty() {
            return Err(PricingError::InvalidTier("name is required".into()));
        }
        if self.commission_value < Decimal::ZERO {
            return Err(PricingError::InvalidTier("commission value must not be negative".into()));
        }
        if self.commission_type == CommissionType::Percentage && self.commission_value > dec!(100) {
            return Err(PricingError::InvalidTier("percentage commission must be at most 100".into()));
        }
        if self.min_monthly_bookings < 0 {
            return Err(PricingError::InvalidTier("min monthly bookings must not be negative".into()));
        }
        if let Some(rating) = self.min_rating {
            if rating < Decimal::ZERO || rating > MAX_RATING {
                return Err(PricingError::InvalidTier("min rating must be between 0 and 5".into()));
            }
        }
        if let Some(until) = self.effective_until {
            if until <= self.effective_from {
                return Err(PricingError::InvalidTier("effective_until must be after effective_from".into()));
            }
        }
        Ok(())
    }
}

/// Conjunto de tiers ordenado por `priority_order` (desempate por id).
#[derive(Debug, Clone, Default)]
pub struct TierCatalog {
    tiers: Vec<PricingTier>,
}

impl TierCatalog {
    pub fn new(mut tiers: Vec<PricingTier>) -> Self {
        tiers.sort_by(|a, b| {
            a.priority_order
                .cmp(&b.priority_order)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { tiers }
    }

    /// Tiers ativos em `now`, em ordem crescente de prioridade.
    pub fn list_active_tiers(&self, now: DateTime<Utc>) -> Vec<&PricingTier> {
        self.tiers.iter().filter(|t| t.is_active_at(now)).collect()
    }

    /// Inclui tiers desativados (reservas antigas continuam referenciando-os).
    pub fn all(&self) -> &[PricingTier] {
        &self.tiers
    }

    pub fn find(&self, id: Uuid) -> Option<&PricingTier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    pub fn find_active(&self, id: Uuid, now: DateTime<Utc>) -> Option<&PricingTier> {
        self.find(id).filter(|t| t.is_active_at(now))
    }
}
