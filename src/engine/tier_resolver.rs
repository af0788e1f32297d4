// src/engine/tier_resolver.rs

use crate::{
    engine::error::PricingError,
    models::{pricing::PricingTier, vendor::VendorMetrics},
};

/// Tier usado quando o vendedor não se qualifica para nenhum outro.
pub const DEFAULT_FALLBACK_TIER: &str = "Bronze";

pub fn is_eligible(metrics: &VendorMetrics, tier: &PricingTier) -> bool {
    let meets_bookings = metrics.monthly_booking_count >= tier.min_monthly_bookings;
    let meets_rating = match tier.min_rating {
        None => true,
        // Sem avaliação não atinge nenhum mínimo
        Some(min) => metrics.average_rating.is_some_and(|rating| rating >= min),
    };
    meets_bookings && meets_rating
}

/// Tier conquistado automaticamente: o elegível de menor `priority_order`.
///
/// Sem nenhum elegível, cai para o tier chamado `fallback_name` e, se ele não
/// existir, para o de menor `priority_order` da lista.
pub fn resolve_automatic_tier<'a>(
    metrics: &VendorMetrics,
    tiers: &[&'a PricingTier],
    fallback_name: &str,
) -> Result<&'a PricingTier, PricingError> {
    let by_priority = |t: &&&'a PricingTier| (t.priority_order, t.id);

    if let Some(tier) = tiers
        .iter()
        .filter(|t| is_eligible(metrics, t))
        .min_by_key(by_priority)
    {
        return Ok(*tier);
    }

    if let Some(tier) = tiers.iter().find(|t| t.name == fallback_name) {
        return Ok(*tier);
    }

    tiers
        .iter()
        .min_by_key(by_priority)
        .copied()
        .ok_or(PricingError::NoTiersConfigured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::{standard_tiers, tier};
    use rust_decimal_macros::dec;

    fn metrics(bookings: i32, rating: Option<rust_decimal::Decimal>) -> VendorMetrics {
        VendorMetrics { monthly_booking_count: bookings, average_rating: rating }
    }

    fn resolve_name(m: VendorMetrics, tiers: &[PricingTier]) -> String {
        let refs: Vec<&PricingTier> = tiers.iter().collect();
        resolve_automatic_tier(&m, &refs, DEFAULT_FALLBACK_TIER)
            .unwrap()
            .name
            .clone()
    }

    #[test]
    fn gold_thresholds_resolve_to_gold() {
        let tiers = standard_tiers();
        assert_eq!(resolve_name(metrics(25, Some(dec!(4.5))), &tiers), "Gold");
    }

    #[test]
    fn rating_gate_blocks_higher_tier() {
        let tiers = standard_tiers();
        // Volume de Platinum, nota de Silver
        assert_eq!(resolve_name(metrics(80, Some(dec!(4.2))), &tiers), "Silver");
    }

    #[test]
    fn missing_rating_only_meets_tiers_without_minimum() {
        let tiers = standard_tiers();
        assert_eq!(resolve_name(metrics(100, None), &tiers), "Bronze");
    }

    #[test]
    fn resolution_never_regresses_as_metrics_grow() {
        let tiers = standard_tiers();
        let refs: Vec<&PricingTier> = tiers.iter().collect();
        let ratings = [None, Some(dec!(3.9)), Some(dec!(4.0)), Some(dec!(4.5)), Some(dec!(4.8)), Some(dec!(5.0))];

        for rating in ratings {
            let mut previous = i32::MAX;
            for bookings in 0..=60 {
                let tier = resolve_automatic_tier(&metrics(bookings, rating), &refs, DEFAULT_FALLBACK_TIER).unwrap();
                assert!(tier.priority_order <= previous, "regressed at {bookings} bookings, rating {rating:?}");
                previous = tier.priority_order;
            }
        }
    }

    #[test]
    fn falls_back_to_bronze_by_name() {
        let tiers = vec![
            tier("Gold", 1, 25, None, dec!(8)),
            tier("Bronze", 2, 5, None, dec!(12)),
            tier("Starter", 3, 3, None, dec!(15)),
        ];
        assert_eq!(resolve_name(metrics(0, None), &tiers), "Bronze");
    }

    #[test]
    fn falls_back_to_lowest_priority_order_without_bronze() {
        let tiers = vec![
            tier("Starter", 7, 3, None, dec!(15)),
            tier("Gold", 2, 25, None, dec!(8)),
        ];
        assert_eq!(resolve_name(metrics(0, None), &tiers), "Gold");
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let result = resolve_automatic_tier(&metrics(10, None), &[], DEFAULT_FALLBACK_TIER);
        assert_eq!(result.unwrap_err(), PricingError::NoTiersConfigured);
    }
}
