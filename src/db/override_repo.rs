// src/db/override_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pricing::{NewServicePricingOverride, ServicePricingOverride},
};

const OVERRIDE_COLUMNS: &str = "id, service_id, override_enabled, override_type, override_value, \
     fee_payer, tourist_percentage, vendor_percentage, effective_from, effective_until, created_by";

#[derive(Clone, Default)]
pub struct OverrideRepository;

impl OverrideRepository {
    pub fn new() -> Self {
        Self
    }

    // Inclui desabilitados e fora da janela: a seleção do vigente é do motor
    pub async fn list_for_service<'e, E>(
        &self,
        executor: E,
        service_id: Uuid,
    ) -> Result<Vec<ServicePricingOverride>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let overrides = sqlx::query_as::<_, ServicePricingOverride>(&format!(
            r#"
            SELECT {OVERRIDE_COLUMNS}
            FROM service_pricing_overrides
            WHERE service_id = $1
            ORDER BY effective_from DESC, id DESC
            "#
        ))
        .bind(service_id)
        .fetch_all(executor)
        .await?;

        Ok(overrides)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        input: &NewServicePricingOverride,
    ) -> Result<ServicePricingOverride, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, ServicePricingOverride>(&format!(
            r#"
            INSERT INTO service_pricing_overrides (
                service_id, override_type, override_value, fee_payer,
                tourist_percentage, vendor_percentage,
                effective_from, effective_until, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {OVERRIDE_COLUMNS}
            "#
        ))
        .bind(input.service_id)
        .bind(input.override_type)
        .bind(input.override_value)
        .bind(input.fee_payer)
        .bind(input.tourist_percentage)
        .bind(input.vendor_percentage)
        .bind(input.effective_from)
        .bind(input.effective_until)
        .bind(&input.created_by)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    pub async fn disable<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ServicePricingOverride>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let disabled = sqlx::query_as::<_, ServicePricingOverride>(&format!(
            "UPDATE service_pricing_overrides SET override_enabled = FALSE, updated_at = NOW() \
             WHERE id = $1 RETURNING {OVERRIDE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(disabled)
    }
}
