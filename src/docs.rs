// src/docs.rs

use utoipa::OpenApi;
use crate::engine;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Health ---
        handlers::pricing::health,

        // --- Tiers ---
        handlers::tiers::list_tiers,
        handlers::tiers::create_tier,
        handlers::tiers::update_tier,
        handlers::tiers::deactivate_tier,

        // --- Overrides ---
        handlers::overrides::list_overrides,
        handlers::overrides::create_override,
        handlers::overrides::disable_override,

        // --- Vendors ---
        handlers::vendors::get_vendor_tier,
        handlers::vendors::assign_manual_tier,
        handlers::vendors::clear_manual_tier,
        handlers::vendors::update_metrics,

        // --- Pricing ---
        handlers::pricing::quote,
        handlers::pricing::price_booking,
        handlers::pricing::sweep_expired_tiers,
    ),
    components(
        schemas(
            // --- Pricing ---
            models::pricing::CommissionType,
            models::pricing::FeePayer,
            models::pricing::PricingSource,
            models::pricing::PricingTier,
            models::pricing::ServicePricingOverride,
            models::pricing::PaymentBreakdown,

            // --- Vendors ---
            models::vendor::VendorMetrics,
            models::vendor::VendorTierView,

            // --- Manutenção ---
            engine::SweepReport,
            engine::SweepError,

            // --- Payloads ---
            handlers::tiers::CreateTierPayload,
            handlers::tiers::UpdateTierPayload,
            handlers::overrides::CreateOverridePayload,
            handlers::vendors::AssignManualTierPayload,
            handlers::vendors::UpdateMetricsPayload,
            handlers::pricing::QuotePayload,
            handlers::pricing::SweepPayload,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Tiers", description = "Catálogo de tiers de comissão"),
        (name = "Overrides", description = "Preço específico por serviço"),
        (name = "Vendors", description = "Tier efetivo, tier manual e métricas do vendedor"),
        (name = "Pricing", description = "Cotação, congelamento da comissão e manutenção")
    )
)]
pub struct ApiDoc;
