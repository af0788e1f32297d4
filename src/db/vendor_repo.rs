// src/db/vendor_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::vendor::{VendorChange, VendorPricingState},
};

const VENDOR_COLUMNS: &str = "id AS vendor_id, monthly_booking_count, average_rating, \
     current_tier_id, current_commission_rate, manual_tier_id, manual_tier_expires_at";

// Só as colunas de tier/métricas da tabela 'vendors'
#[derive(Clone, Default)]
pub struct VendorRepository;

impl VendorRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        vendor_id: Uuid,
    ) -> Result<Option<VendorPricingState>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vendor = sqlx::query_as::<_, VendorPricingState>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1"
        ))
        .bind(vendor_id)
        .fetch_optional(executor)
        .await?;

        Ok(vendor)
    }

    pub async fn list_expired_manual_tiers<'e, E>(
        &self,
        executor: E,
        now: DateTime<Utc>,
    ) -> Result<Vec<VendorPricingState>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vendors = sqlx::query_as::<_, VendorPricingState>(&format!(
            r#"
            SELECT {VENDOR_COLUMNS}
            FROM vendors
            WHERE manual_tier_id IS NOT NULL
              AND manual_tier_expires_at IS NOT NULL
              AND manual_tier_expires_at <= $1
            ORDER BY manual_tier_expires_at ASC
            "#
        ))
        .bind(now)
        .fetch_all(executor)
        .await?;

        Ok(vendors)
    }

    /// Um UPDATE por tipo de mudança, tocando só as próprias colunas.
    pub async fn apply_change<'e, E>(
        &self,
        executor: E,
        vendor_id: Uuid,
        change: &VendorChange,
    ) -> Result<Option<VendorPricingState>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let query = match change {
            VendorChange::Metrics(_) => format!(
                "UPDATE vendors SET monthly_booking_count = $2, average_rating = $3, updated_at = NOW() \
                 WHERE id = $1 RETURNING {VENDOR_COLUMNS}"
            ),
            VendorChange::AssignManualTier { .. } => format!(
                "UPDATE vendors SET manual_tier_id = $2, manual_tier_expires_at = $3, updated_at = NOW() \
                 WHERE id = $1 RETURNING {VENDOR_COLUMNS}"
            ),
            VendorChange::ClearManualTier => format!(
                "UPDATE vendors SET manual_tier_id = NULL, manual_tier_expires_at = NULL, updated_at = NOW() \
                 WHERE id = $1 RETURNING {VENDOR_COLUMNS}"
            ),
        };

        let mut update = sqlx::query_as::<_, VendorPricingState>(&query).bind(vendor_id);
        update = match change {
            VendorChange::Metrics(metrics) => update
                .bind(metrics.monthly_booking_count)
                .bind(metrics.average_rating),
            VendorChange::AssignManualTier { tier_id, expires_at } => {
                update.bind(*tier_id).bind(*expires_at)
            }
            VendorChange::ClearManualTier => update,
        };

        let vendor = update.fetch_optional(executor).await?;
        Ok(vendor)
    }

    /// Compare-and-set da projeção memorizada: só grava se métricas e tier
    /// manual ainda forem os lidos em `computed_from`.
    pub async fn save_assignment<'e, E>(
        &self,
        executor: E,
        computed_from: &VendorPricingState,
        tier_id: Uuid,
        commission_rate: Decimal,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE vendors SET
                current_tier_id = $2,
                current_commission_rate = $3,
                updated_at = NOW()
            WHERE id = $1
              AND monthly_booking_count = $4
              AND average_rating IS NOT DISTINCT FROM $5
              AND manual_tier_id IS NOT DISTINCT FROM $6
              AND manual_tier_expires_at IS NOT DISTINCT FROM $7
            "#,
        )
        .bind(computed_from.vendor_id)
        .bind(tier_id)
        .bind(commission_rate)
        .bind(computed_from.monthly_booking_count)
        .bind(computed_from.average_rating)
        .bind(computed_from.manual_tier_id)
        .bind(computed_from.manual_tier_expires_at)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Limpa o tier manual só se ele continuar expirado; varreduras
    /// concorrentes resultam em no máximo uma escrita efetiva.
    pub async fn reset_expired_manual_tier<'e, E>(
        &self,
        executor: E,
        vendor_id: Uuid,
        tier_id: Uuid,
        commission_rate: Decimal,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE vendors SET
                current_tier_id = $2,
                current_commission_rate = $3,
                manual_tier_id = NULL,
                manual_tier_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
              AND manual_tier_expires_at IS NOT NULL
              AND manual_tier_expires_at <= $4
            "#,
        )
        .bind(vendor_id)
        .bind(tier_id)
        .bind(commission_rate)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
