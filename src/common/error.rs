// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::i18n::I18nStore,
    engine::{PricingError, StoreError},
    middleware::i18n::Locale,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erros do motor de comissão
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Tier {0} não encontrado")]
    TierNotFound(Uuid),

    #[error("Já existe um tier ativo com prioridade {0}")]
    DuplicateTierPriority(i32),

    #[error("Override {0} não encontrado")]
    OverrideNotFound(Uuid),

    #[error("Vendedor {0} não encontrado")]
    VendorNotFound(Uuid),

    #[error("Reserva {0} não encontrada")]
    BookingNotFound(Uuid),

    #[error("Reserva {0} já possui comissão congelada")]
    BookingAlreadyPriced(Uuid),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Falha do armazenamento vinda do motor (varredura)
    #[error(transparent)]
    Store(#[from] StoreError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro que de fato sai na resposta HTTP, já traduzido
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Chave no I18nStore + detalhe opcional anexado à mensagem.
    fn message_key(&self) -> (&'static str, Option<String>) {
        match self {
            AppError::ValidationError(errors) => ("validation_failed", Some(errors.to_string())),
            AppError::Pricing(err) => match err {
                PricingError::NoTiersConfigured => ("no_tiers_configured", None),
                PricingError::ManualTierNotFound(id) => ("manual_tier_not_found", Some(id.to_string())),
                PricingError::InvalidGrossAmount(amount) => ("invalid_gross_amount", Some(amount.to_string())),
                PricingError::MisconfiguredSharedSplit { tourist, vendor } => {
                    ("misconfigured_shared_split", Some(format!("{tourist} + {vendor}")))
                }
                PricingError::OverrideAmbiguous { service_id, .. } => ("override_ambiguous", Some(service_id.to_string())),
                PricingError::FeeExceedsGrossAmount { fee, gross } => {
                    ("fee_exceeds_gross_amount", Some(format!("{fee} > {gross}")))
                }
                PricingError::InvalidOverride(reason) => ("invalid_override", Some(reason.clone())),
                PricingError::InvalidTier(reason) => ("invalid_tier", Some(reason.clone())),
            },
            AppError::TierNotFound(id) => ("tier_not_found", Some(id.to_string())),
            AppError::DuplicateTierPriority(priority) => ("duplicate_tier_priority", Some(priority.to_string())),
            AppError::OverrideNotFound(id) => ("override_not_found", Some(id.to_string())),
            AppError::VendorNotFound(id) => ("vendor_not_found", Some(id.to_string())),
            AppError::BookingNotFound(id) => ("booking_not_found", Some(id.to_string())),
            AppError::BookingAlreadyPriced(id) => ("booking_already_priced", Some(id.to_string())),
            AppError::DatabaseError(_) | AppError::Store(_) | AppError::InternalServerError(_) => {
                ("internal_error", None)
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Pricing(PricingError::NoTiersConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Pricing(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateTierPriority(_) | AppError::BookingAlreadyPriced(_) => StatusCode::CONFLICT,
            AppError::TierNotFound(_)
            | AppError::OverrideNotFound(_)
            | AppError::VendorNotFound(_)
            | AppError::BookingNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::Store(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let status = self.status_code();
        if status.is_server_error() {
            // O detalhe vai para o log, nunca para o cliente
            tracing::error!(error = %self, "Erro Interno do Servidor");
        }

        let (key, detail) = self.message_key();
        let mut message = i18n.translate(&locale.0, key);
        if let Some(detail) = detail.filter(|_| !status.is_server_error()) {
            message = format!("{message} ({detail})");
        }

        ApiError { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
