// src/handlers/tiers.rs

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
    common::{
        error::{ApiError, AppError},
        serde_utils::double_option,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::pricing::{CommissionType, NewPricingTier, PricingTier, UpdatePricingTier},
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTierPayload {
    #[validate(length(min = 1, max = 50, message = "required"))]
    #[schema(example = "Gold")]
    pub name: String,

    pub commission_type: CommissionType,

    #[schema(example = "8.5")]
    pub commission_value: Decimal,

    #[validate(range(min = 0))]
    #[schema(example = 25)]
    pub min_monthly_bookings: i32,

    #[schema(example = "4.5")]
    pub min_rating: Option<Decimal>,

    #[schema(example = 2)]
    pub priority_order: i32,

    // Ausente = a partir de agora
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTierPayload {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub commission_type: Option<CommissionType>,
    pub commission_value: Option<Decimal>,
    #[validate(range(min = 0))]
    pub min_monthly_bookings: Option<i32>,
    /// `null` remove a exigência de avaliação.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub min_rating: Option<Option<Decimal>>,
    pub priority_order: Option<i32>,
    /// `null` torna o tier sem data de término.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub effective_until: Option<Option<DateTime<Utc>>>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// GET /api/pricing/tiers
#[utoipa::path(
    get,
    path = "/api/pricing/tiers",
    tag = "Tiers",
    responses(
        (status = 200, description = "Tiers ativos em ordem de prioridade", body = Vec<PricingTier>)
    )
)]
pub async fn list_tiers(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let tiers = app_state.tier_service
        .list_active_tiers(Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tiers)))
}

// POST /api/pricing/tiers
#[utoipa::path(
    post,
    path = "/api/pricing/tiers",
    tag = "Tiers",
    request_body = CreateTierPayload,
    responses(
        (status = 201, description = "Tier criado", body = PricingTier),
        (status = 409, description = "Prioridade já usada por outro tier ativo")
    )
)]
pub async fn create_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateTierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let now = Utc::now();
    let input = NewPricingTier {
        name: payload.name.trim().to_string(),
        commission_type: payload.commission_type,
        commission_value: payload.commission_value,
        min_monthly_bookings: payload.min_monthly_bookings,
        min_rating: payload.min_rating,
        priority_order: payload.priority_order,
        effective_from: payload.effective_from.unwrap_or(now),
        effective_until: payload.effective_until,
    };

    let tier = app_state.tier_service
        .create_tier(input)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(tier)))
}

// PUT /api/pricing/tiers/{id}
#[utoipa::path(
    put,
    path = "/api/pricing/tiers/{id}",
    tag = "Tiers",
    request_body = UpdateTierPayload,
    responses(
        (status = 200, description = "Tier atualizado", body = PricingTier),
        (status = 404, description = "Tier não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do Tier"))
)]
pub async fn update_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let changes = UpdatePricingTier {
        name: payload.name,
        commission_type: payload.commission_type,
        commission_value: payload.commission_value,
        min_monthly_bookings: payload.min_monthly_bookings,
        min_rating: payload.min_rating,
        priority_order: payload.priority_order,
        effective_until: payload.effective_until,
    };

    let tier = app_state.tier_service
        .update_tier(id, changes)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tier)))
}

// POST /api/pricing/tiers/{id}/deactivate
#[utoipa::path(
    post,
    path = "/api/pricing/tiers/{id}/deactivate",
    tag = "Tiers",
    responses(
        (status = 200, description = "Tier desativado (nunca é apagado)", body = PricingTier),
        (status = 404, description = "Tier não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do Tier"))
)]
pub async fn deactivate_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tier = app_state.tier_service
        .deactivate_tier(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tier)))
}
