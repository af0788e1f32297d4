// src/engine/error.rs

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    // Fatal: a reserva não consegue se precificar
    #[error("no pricing tiers are configured")]
    NoTiersConfigured,

    // Recuperável: quem chama cai para o tier automático
    #[error("manual tier {0} not found among active tiers")]
    ManualTierNotFound(Uuid),

    // Não positivo, com mais casas que a moeda ou grande demais para calcular
    #[error("invalid gross amount {0}")]
    InvalidGrossAmount(Decimal),

    #[error("shared fee split must sum to 100 (tourist {tourist}, vendor {vendor})")]
    MisconfiguredSharedSplit { tourist: Decimal, vendor: Decimal },

    // Só é logado; o desempate por id resolve
    #[error("{candidates} overrides for service {service_id} share the same effective_from")]
    OverrideAmbiguous { service_id: Uuid, candidates: usize },

    #[error("fee {fee} exceeds gross amount {gross}")]
    FeeExceedsGrossAmount { fee: Decimal, gross: Decimal },

    #[error("invalid override: {0}")]
    InvalidOverride(String),

    #[error("invalid tier: {0}")]
    InvalidTier(String),
}

/// Falha do armazenamento usado pela varredura, sem depender da camada HTTP.
#[derive(Debug, Error)]
#[error("pricing store failure: {0}")]
pub struct StoreError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}
