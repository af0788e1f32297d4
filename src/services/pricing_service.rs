// src/services/pricing_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    engine::{self, EngineSettings, PricingEngine, SweepReport},
    models::pricing::PaymentBreakdown,
    services::pricing_store::PricingStore,
};

#[derive(Clone)]
pub struct PricingService {
    store: Arc<dyn PricingStore>,
    settings: EngineSettings,
}

impl PricingService {
    pub fn new(store: Arc<dyn PricingStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    /// Simula o pagamento sem gravar nada (tela de checkout).
    pub async fn quote(
        &self,
        gross_amount: Decimal,
        service_id: Uuid,
        vendor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PaymentBreakdown, AppError> {
        let snapshot = self.store.pricing_snapshot(service_id, vendor_id).await?;
        let vendor = snapshot.vendor.ok_or(AppError::VendorNotFound(vendor_id))?;

        let engine = PricingEngine::new(snapshot.tiers, snapshot.overrides, self.settings.clone());
        let breakdown = engine.compute_payment(gross_amount, service_id, &vendor, now)?;

        Ok(breakdown)
    }

    /// LÓGICA DE NEGÓCIO: calcula e congela a comissão de uma reserva.
    ///
    /// Depois de gravada, mudanças de tier ou override não alteram mais a reserva.
    pub async fn price_booking(
        &self,
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PaymentBreakdown, AppError> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await?
            .ok_or(AppError::BookingNotFound(booking_id))?;

        if booking.is_priced() {
            return Err(AppError::BookingAlreadyPriced(booking_id));
        }

        let breakdown = self
            .quote(booking.gross_amount, booking.service_id, booking.vendor_id, now)
            .await?;

        // Outra requisição pode ter congelado a reserva entre a leitura e a escrita
        let frozen = self
            .store
            .freeze_booking_pricing(booking_id, &breakdown, now)
            .await?;
        if !frozen {
            return Err(AppError::BookingAlreadyPriced(booking_id));
        }

        tracing::info!(
            %booking_id,
            vendor_id = %booking.vendor_id,
            source = ?breakdown.source,
            commission = %breakdown.commission_amount,
            "Comissão congelada na reserva"
        );

        Ok(breakdown)
    }

    pub async fn sweep_expired_manual_tiers(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, AppError> {
        let report = engine::sweep_expired_manual_tiers(
            self.store.as_ref(),
            now,
            &self.settings.fallback_tier_name,
        )
        .await?;

        Ok(report)
    }
}
