// src/handlers/overrides.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::pricing::{CommissionType, FeePayer, NewServicePricingOverride, ServicePricingOverride},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOverridePayload {
    pub override_type: CommissionType,

    #[schema(example = "20")]
    pub override_value: Decimal,

    pub fee_payer: FeePayer,

    #[schema(example = "40")]
    pub tourist_percentage: Option<Decimal>,
    #[schema(example = "60")]
    pub vendor_percentage: Option<Decimal>,

    pub effective_from: Option<DateTime<Utc>>,
    pub effective_until: Option<DateTime<Utc>>,

    // Auditoria: quem configurou o override
    #[validate(length(min = 1, max = 255, message = "required"))]
    #[schema(example = "ops@tourism.app")]
    pub created_by: String,
}

// GET /api/pricing/services/{service_id}/overrides
#[utoipa::path(
    get,
    path = "/api/pricing/services/{service_id}/overrides",
    tag = "Overrides",
    responses(
        (status = 200, description = "Overrides do serviço, mais recentes primeiro", body = Vec<ServicePricingOverride>)
    ),
    params(("service_id" = Uuid, Path, description = "ID do Serviço"))
)]
pub async fn list_overrides(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(service_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let overrides = app_state.override_service
        .list_for_service(service_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(overrides)))
}

// POST /api/pricing/services/{service_id}/overrides
#[utoipa::path(
    post,
    path = "/api/pricing/services/{service_id}/overrides",
    tag = "Overrides",
    request_body = CreateOverridePayload,
    responses(
        (status = 201, description = "Override criado", body = ServicePricingOverride),
        (status = 400, description = "Divisão shared inválida ou valores fora do intervalo")
    ),
    params(("service_id" = Uuid, Path, description = "ID do Serviço"))
)]
pub async fn create_override(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(service_id): Path<Uuid>,
    Json(payload): Json<CreateOverridePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let input = NewServicePricingOverride {
        service_id,
        override_type: payload.override_type,
        override_value: payload.override_value,
        fee_payer: payload.fee_payer,
        tourist_percentage: payload.tourist_percentage,
        vendor_percentage: payload.vendor_percentage,
        effective_from: payload.effective_from.unwrap_or_else(Utc::now),
        effective_until: payload.effective_until,
        created_by: payload.created_by.trim().to_string(),
    };

    let created = app_state.override_service
        .create_override(input)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// POST /api/pricing/overrides/{id}/disable
#[utoipa::path(
    post,
    path = "/api/pricing/overrides/{id}/disable",
    tag = "Overrides",
    responses(
        (status = 200, description = "Override desligado", body = ServicePricingOverride),
        (status = 404, description = "Override não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do Override"))
)]
pub async fn disable_override(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let disabled = app_state.override_service
        .disable_override(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(disabled)))
}
