// src/db/tier_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pricing::{NewPricingTier, PricingTier},
};

const TIER_COLUMNS: &str = "id, name, commission_type, commission_value, min_monthly_bookings, \
     min_rating, priority_order, effective_from, effective_until, is_active";

#[derive(Clone, Default)]
pub struct TierRepository;

impl TierRepository {
    pub fn new() -> Self {
        Self
    }

    // Todos os tiers, inclusive desativados; o filtro por data fica no catálogo
    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<PricingTier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tiers = sqlx::query_as::<_, PricingTier>(&format!(
            "SELECT {TIER_COLUMNS} FROM pricing_tiers ORDER BY priority_order ASC, id ASC"
        ))
        .fetch_all(executor)
        .await?;

        Ok(tiers)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<PricingTier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tier = sqlx::query_as::<_, PricingTier>(&format!(
            "SELECT {TIER_COLUMNS} FROM pricing_tiers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(tier)
    }

    pub async fn create<'e, E>(&self, executor: E, input: &NewPricingTier) -> Result<PricingTier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tier = sqlx::query_as::<_, PricingTier>(&format!(
            r#"
            INSERT INTO pricing_tiers (
                name, commission_type, commission_value, min_monthly_bookings,
                min_rating, priority_order, effective_from, effective_until
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TIER_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.commission_type)
        .bind(input.commission_value)
        .bind(input.min_monthly_bookings)
        .bind(input.min_rating)
        .bind(input.priority_order)
        .bind(input.effective_from)
        .bind(input.effective_until)
        .fetch_one(executor)
        .await?;

        Ok(tier)
    }

    pub async fn update<'e, E>(&self, executor: E, tier: &PricingTier) -> Result<PricingTier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, PricingTier>(&format!(
            r#"
            UPDATE pricing_tiers SET
                name = $2,
                commission_type = $3,
                commission_value = $4,
                min_monthly_bookings = $5,
                min_rating = $6,
                priority_order = $7,
                effective_until = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TIER_COLUMNS}
            "#
        ))
        .bind(tier.id)
        .bind(&tier.name)
        .bind(tier.commission_type)
        .bind(tier.commission_value)
        .bind(tier.min_monthly_bookings)
        .bind(tier.min_rating)
        .bind(tier.priority_order)
        .bind(tier.effective_until)
        .fetch_optional(executor)
        .await?;

        updated.ok_or(AppError::TierNotFound(tier.id))
    }

    pub async fn deactivate<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<PricingTier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tier = sqlx::query_as::<_, PricingTier>(&format!(
            "UPDATE pricing_tiers SET is_active = FALSE, updated_at = NOW() WHERE id = $1 RETURNING {TIER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(tier)
    }
}
