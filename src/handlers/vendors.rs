// src/handlers/vendors.rs

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
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    engine::tier_catalog::MAX_RATING,
    middleware::i18n::Locale,
    models::vendor::{VendorMetrics, VendorTierView},
};

fn validate_rating(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val > MAX_RATING {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &5.0);
        err.message = Some("A avaliação deve estar entre 0 e 5.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignManualTierPayload {
    pub tier_id: Uuid,
    // Ausente = sem data de expiração
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetricsPayload {
    #[validate(range(min = 0))]
    #[schema(example = 25)]
    pub monthly_booking_count: i32,

    #[validate(custom(function = "validate_rating"))]
    #[schema(example = "4.5")]
    pub average_rating: Option<Decimal>,
}

// GET /api/pricing/vendors/{vendor_id}/tier
#[utoipa::path(
    get,
    path = "/api/pricing/vendors/{vendor_id}/tier",
    tag = "Vendors",
    responses(
        (status = 200, description = "Tier efetivo do vendedor", body = VendorTierView),
        (status = 404, description = "Vendedor não encontrado")
    ),
    params(("vendor_id" = Uuid, Path, description = "ID do Vendedor"))
)]
pub async fn get_vendor_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.tier_service
        .effective_tier(vendor_id, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// PUT /api/pricing/vendors/{vendor_id}/manual-tier
#[utoipa::path(
    put,
    path = "/api/pricing/vendors/{vendor_id}/manual-tier",
    tag = "Vendors",
    request_body = AssignManualTierPayload,
    responses(
        (status = 200, description = "Tier manual atribuído", body = VendorTierView),
        (status = 404, description = "Vendedor ou tier não encontrado")
    ),
    params(("vendor_id" = Uuid, Path, description = "ID do Vendedor"))
)]
pub async fn assign_manual_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(vendor_id): Path<Uuid>,
    Json(payload): Json<AssignManualTierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state.tier_service
        .assign_manual_tier(vendor_id, payload.tier_id, payload.expires_at, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/pricing/vendors/{vendor_id}/manual-tier
#[utoipa::path(
    delete,
    path = "/api/pricing/vendors/{vendor_id}/manual-tier",
    tag = "Vendors",
    responses(
        (status = 200, description = "Vendedor volta ao tier automático", body = VendorTierView),
        (status = 404, description = "Vendedor não encontrado")
    ),
    params(("vendor_id" = Uuid, Path, description = "ID do Vendedor"))
)]
pub async fn clear_manual_tier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.tier_service
        .clear_manual_tier(vendor_id, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// PUT /api/pricing/vendors/{vendor_id}/metrics
#[utoipa::path(
    put,
    path = "/api/pricing/vendors/{vendor_id}/metrics",
    tag = "Vendors",
    request_body = UpdateMetricsPayload,
    responses(
        (status = 200, description = "Métricas gravadas e tier recalculado", body = VendorTierView),
        (status = 404, description = "Vendedor não encontrado")
    ),
    params(("vendor_id" = Uuid, Path, description = "ID do Vendedor"))
)]
pub async fn update_metrics(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(vendor_id): Path<Uuid>,
    Json(payload): Json<UpdateMetricsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let metrics = VendorMetrics {
        monthly_booking_count: payload.monthly_booking_count,
        average_rating: payload.average_rating,
    };

    let view = app_state.tier_service
        .update_metrics(vendor_id, metrics, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn metrics(rating: Option<Decimal>) -> UpdateMetricsPayload {
        UpdateMetricsPayload { monthly_booking_count: 10, average_rating: rating }
    }

    #[test]
    fn average_rating_must_be_between_zero_and_five() {
        assert!(metrics(Some(dec!(4.5))).validate().is_ok());
        assert!(metrics(Some(dec!(5))).validate().is_ok());
        assert!(metrics(None).validate().is_ok());

        assert!(metrics(Some(dec!(6))).validate().is_err());
        assert!(metrics(Some(dec!(-0.1))).validate().is_err());
    }
}
