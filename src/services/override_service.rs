// src/services/override_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pricing::{NewServicePricingOverride, ServicePricingOverride},
    services::pricing_store::PricingStore,
};

#[derive(Clone)]
pub struct OverrideService {
    store: Arc<dyn PricingStore>,
}

impl OverrideService {
    pub fn new(store: Arc<dyn PricingStore>) -> Self {
        Self { store }
    }

    pub async fn list_for_service(
        &self,
        service_id: Uuid,
    ) -> Result<Vec<ServicePricingOverride>, AppError> {
        self.store.list_overrides_for_service(service_id).await
    }

    pub async fn create_override(
        &self,
        input: NewServicePricingOverride,
    ) -> Result<ServicePricingOverride, AppError> {
        let candidate = ServicePricingOverride {
            id: Uuid::nil(),
            service_id: input.service_id,
            override_enabled: true,
            override_type: input.override_type,
            override_value: input.override_value,
            fee_payer: input.fee_payer,
            tourist_percentage: input.tourist_percentage,
            vendor_percentage: input.vendor_percentage,
            effective_from: input.effective_from,
            effective_until: input.effective_until,
            created_by: input.created_by.clone(),
        };
        candidate.validate()?;

        let created = self.store.insert_override(&input).await?;
        tracing::info!(
            override_id = %created.id,
            service_id = %created.service_id,
            fee_payer = ?created.fee_payer,
            created_by = %created.created_by,
            "Override de preço criado"
        );
        Ok(created)
    }

    pub async fn disable_override(&self, id: Uuid) -> Result<ServicePricingOverride, AppError> {
        self.store
            .disable_override(id)
            .await?
            .ok_or(AppError::OverrideNotFound(id))
    }
}
