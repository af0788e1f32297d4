// src/handlers/pricing.rs

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
    engine::SweepReport,
    middleware::i18n::Locale,
    models::pricing::PaymentBreakdown,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    // Positividade é checada pelo motor (InvalidGrossAmount)
    #[schema(example = "100000")]
    pub gross_amount: Decimal,
    pub service_id: Uuid,
    pub vendor_id: Uuid,
    // Permite simular a cotação em outro instante
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepPayload {
    pub now: Option<DateTime<Utc>>,
}

// POST /api/pricing/quote
#[utoipa::path(
    post,
    path = "/api/pricing/quote",
    tag = "Pricing",
    request_body = QuotePayload,
    responses(
        (status = 200, description = "Simulação do pagamento", body = PaymentBreakdown),
        (status = 400, description = "Valor bruto inválido ou configuração de preço inválida"),
        (status = 503, description = "Nenhum tier configurado")
    )
)]
pub async fn quote(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<QuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let now = payload.at.unwrap_or_else(Utc::now);
    let breakdown = app_state.pricing_service
        .quote(payload.gross_amount, payload.service_id, payload.vendor_id, now)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(breakdown)))
}

// POST /api/bookings/{booking_id}/commission
#[utoipa::path(
    post,
    path = "/api/bookings/{booking_id}/commission",
    tag = "Pricing",
    responses(
        (status = 200, description = "Comissão calculada e congelada na reserva", body = PaymentBreakdown),
        (status = 404, description = "Reserva não encontrada"),
        (status = 409, description = "Reserva já precificada")
    ),
    params(("booking_id" = Uuid, Path, description = "ID da Reserva"))
)]
pub async fn price_booking(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let breakdown = app_state.pricing_service
        .price_booking(booking_id, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(breakdown)))
}

// POST /api/pricing/maintenance/expired-tiers
#[utoipa::path(
    post,
    path = "/api/pricing/maintenance/expired-tiers",
    tag = "Pricing",
    request_body(content = SweepPayload, description = "Instante de referência opcional"),
    responses(
        (status = 200, description = "Tiers manuais expirados foram limpos", body = SweepReport)
    )
)]
pub async fn sweep_expired_tiers(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Option<Json<SweepPayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let now = payload
        .and_then(|Json(p)| p.now)
        .unwrap_or_else(Utc::now);

    let report = app_state.pricing_service
        .sweep_expired_manual_tiers(now)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Serviço no ar"))
)]
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
