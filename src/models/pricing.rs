// src/models/pricing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::serde_utils::double_option;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "commission_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    Percentage, // commission_value é um percentual (0-100)
    Fixed,      // commission_value é um valor absoluto na moeda
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "fee_payer", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeePayer {
    Platform,
    Tourist,
    Vendor,
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pricing_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PricingSource {
    ServiceOverride,
    ManualTier,
    AutomaticTier,
}

// --- Tiers de Comissão ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "Gold")]
    pub name: String,

    pub commission_type: CommissionType,

    #[schema(example = "8.5")]
    pub commission_value: Decimal,

    #[schema(example = 25)]
    pub min_monthly_bookings: i32,

    #[schema(example = "4.5")]
    pub min_rating: Option<Decimal>,

    // Menor = mais preferido quando vários tiers são elegíveis
    #[schema(example = 2)]
    pub priority_order: i32,

    pub effective_from: DateTime<Utc>,
    pub effective_until: Option<DateTime<Utc>>,

    #[schema(example = true)]
    pub is_active: bool,
}

impl PricingTier {
    /// Ativo e dentro da janela [effective_from, effective_until).
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.effective_from <= now
            && self.effective_until.is_none_or(|until| until > now)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPricingTier {
    pub name: String,
    pub commission_type: CommissionType,
    pub commission_value: Decimal,
    pub min_monthly_bookings: i32,
    pub min_rating: Option<Decimal>,
    pub priority_order: i32,
    pub effective_from: DateTime<Utc>,
    pub effective_until: Option<DateTime<Utc>>,
}

/// Campos ausentes mantêm o valor atual.
///
/// `min_rating` e `effective_until` aceitam `null` para limpar a coluna:
/// `Some(None)` limpa, `None` mantém.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricingTier {
    pub name: Option<String>,
    pub commission_type: Option<CommissionType>,
    pub commission_value: Option<Decimal>,
    pub min_monthly_bookings: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub min_rating: Option<Option<Decimal>>,
    pub priority_order: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub effective_until: Option<Option<DateTime<Utc>>>,
}

// --- Override por Serviço ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePricingOverride {
    pub id: Uuid,
    pub service_id: Uuid,

    #[schema(example = true)]
    pub override_enabled: bool,

    pub override_type: CommissionType,

    #[schema(example = "20")]
    pub override_value: Decimal,

    pub fee_payer: FeePayer,

    // Só fazem sentido quando fee_payer = shared (somam 100)
    #[schema(example = "40")]
    pub tourist_percentage: Option<Decimal>,
    #[schema(example = "60")]
    pub vendor_percentage: Option<Decimal>,

    pub effective_from: DateTime<Utc>,
    pub effective_until: Option<DateTime<Utc>>,

    #[schema(example = "admin@tourism.app")]
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewServicePricingOverride {
    pub service_id: Uuid,
    pub override_type: CommissionType,
    pub override_value: Decimal,
    pub fee_payer: FeePayer,
    pub tourist_percentage: Option<Decimal>,
    pub vendor_percentage: Option<Decimal>,
    pub effective_from: DateTime<Utc>,
    pub effective_until: Option<DateTime<Utc>>,
    pub created_by: String,
}

// --- Resultado do cálculo ---

/// Congelado no momento da reserva; mudanças de tier nunca alteram reservas antigas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    #[schema(example = "100000")]
    pub gross_amount: Decimal,

    pub commission_type: CommissionType,

    // Percentual efetivo (para taxa fixa: fee / gross * 100)
    #[schema(example = "20")]
    pub commission_rate: Decimal,

    #[schema(example = "20000")]
    pub commission_amount: Decimal,

    #[schema(example = "88000")]
    pub vendor_payout_amount: Decimal,

    // O que o turista efetivamente paga (bookings.total_amount)
    #[schema(example = "108000")]
    pub tourist_total_amount: Decimal,

    #[schema(example = "8000")]
    pub tourist_fee_share: Decimal,

    #[schema(example = "12000")]
    pub vendor_fee_share: Decimal,

    pub fee_payer: FeePayer,
    pub source: PricingSource,

    pub tier_id: Option<Uuid>,
    pub override_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tier_update_tells_null_from_missing() {
        let cleared: UpdatePricingTier =
            serde_json::from_str(r#"{"minRating": null, "effectiveUntil": null}"#).unwrap();
        assert_eq!(cleared.min_rating, Some(None));
        assert_eq!(cleared.effective_until, Some(None));

        let untouched: UpdatePricingTier = serde_json::from_str(r#"{"name": "Gold"}"#).unwrap();
        assert_eq!(untouched.min_rating, None);
        assert_eq!(untouched.effective_until, None);

        let set: UpdatePricingTier = serde_json::from_str(r#"{"minRating": 4.2}"#).unwrap();
        assert_eq!(set.min_rating, Some(Some(dec!(4.2))));
    }
}
