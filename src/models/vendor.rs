// src/models/vendor.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::pricing::{CommissionType, PricingSource};

/// Colunas de tier/métricas da tabela `vendors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorPricingState {
    pub vendor_id: Uuid,

    #[schema(example = 12)]
    pub monthly_booking_count: i32,

    #[schema(example = "4.7")]
    pub average_rating: Option<Decimal>,

    // Projeção memorizada do tier efetivo; recalculada por quem escreve.
    // Para tiers `fixed` a "taxa" é o valor absoluto do tier.
    pub current_tier_id: Option<Uuid>,
    #[schema(example = "10")]
    pub current_commission_rate: Decimal,

    pub manual_tier_id: Option<Uuid>,
    pub manual_tier_expires_at: Option<DateTime<Utc>>,
}

impl VendorPricingState {
    pub fn metrics(&self) -> VendorMetrics {
        VendorMetrics {
            monthly_booking_count: self.monthly_booking_count,
            average_rating: self.average_rating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorMetrics {
    #[schema(example = 25)]
    pub monthly_booking_count: i32,
    #[schema(example = "4.5")]
    pub average_rating: Option<Decimal>,
}

/// Uma escrita sobre o vendedor. Cada variante toca só as próprias colunas,
/// então escritas concorrentes de tipos diferentes não se sobrescrevem.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorChange {
    Metrics(VendorMetrics),
    AssignManualTier {
        tier_id: Uuid,
        expires_at: Option<DateTime<Utc>>,
    },
    ClearManualTier,
}

/// Resposta de GET /api/pricing/vendors/{vendor_id}/tier
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorTierView {
    pub vendor_id: Uuid,
    pub tier_id: Uuid,
    #[schema(example = "Gold")]
    pub tier_name: String,
    pub commission_type: CommissionType,
    // Percentual para `percentage`, valor absoluto na moeda para `fixed`
    #[schema(example = "8.5")]
    pub commission_rate: Decimal,
    pub source: PricingSource,
    pub manual_tier_expires_at: Option<DateTime<Utc>>,
}
