// src/models/booking.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::pricing::PricingSource;

// Só os campos da reserva que o cálculo de comissão lê ou escreve
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub vendor_id: Uuid,

    #[schema(example = "100000")]
    pub gross_amount: Decimal,

    // Preenchidos uma única vez, quando a comissão é congelada
    pub total_amount: Option<Decimal>,
    pub commission_rate_at_booking: Option<Decimal>,
    pub commission_amount: Option<Decimal>,
    pub vendor_payout_amount: Option<Decimal>,
    pub tourist_fee_share: Option<Decimal>,
    pub vendor_fee_share: Option<Decimal>,
    pub pricing_source: Option<PricingSource>,
    pub priced_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn is_priced(&self) -> bool {
        self.priced_at.is_some()
    }
}
