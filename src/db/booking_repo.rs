// src/db/booking_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{booking::Booking, pricing::PaymentBreakdown},
};

#[derive(Clone, Default)]
pub struct BookingRepository;

impl BookingRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, booking_id: Uuid) -> Result<Option<Booking>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT
                id, service_id, vendor_id, gross_amount,
                total_amount, commission_rate_at_booking, commission_amount,
                vendor_payout_amount, tourist_fee_share, vendor_fee_share,
                pricing_source, priced_at
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(executor)
        .await?;

        Ok(booking)
    }

    /// `WHERE priced_at IS NULL` garante que a comissão é gravada uma única vez.
    pub async fn freeze_pricing<'e, E>(
        &self,
        executor: E,
        booking_id: Uuid,
        breakdown: &PaymentBreakdown,
        priced_at: DateTime<Utc>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                total_amount = $2,
                commission_rate_at_booking = $3,
                commission_amount = $4,
                vendor_payout_amount = $5,
                tourist_fee_share = $6,
                vendor_fee_share = $7,
                fee_payer = $8,
                pricing_source = $9,
                pricing_tier_id = $10,
                pricing_override_id = $11,
                priced_at = $12
            WHERE id = $1 AND priced_at IS NULL
            "#,
        )
        .bind(booking_id)
        .bind(breakdown.tourist_total_amount)
        .bind(breakdown.commission_rate)
        .bind(breakdown.commission_amount)
        .bind(breakdown.vendor_payout_amount)
        .bind(breakdown.tourist_fee_share)
        .bind(breakdown.vendor_fee_share)
        .bind(breakdown.fee_payer)
        .bind(breakdown.source)
        .bind(breakdown.tier_id)
        .bind(breakdown.override_id)
        .bind(priced_at)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
