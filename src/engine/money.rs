// src/engine/money.rs

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::models::pricing::CommissionType;

/// Arredonda para a menor unidade da moeda (half-up).
pub fn round_money(amount: Decimal, minor_units: u32) -> Decimal {
    amount.round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero)
}

/// `value`% de `amount`, sem arredondar. `None` se estourar o `Decimal`.
pub fn percent_of(amount: Decimal, value: Decimal) -> Option<Decimal> {
    amount.checked_mul(value)?.checked_div(dec!(100))
}

/// Taxa bruta (não arredondada) aplicada sobre `gross`.
pub fn fee_for(gross: Decimal, kind: CommissionType, value: Decimal) -> Option<Decimal> {
    match kind {
        CommissionType::Percentage => percent_of(gross, value),
        CommissionType::Fixed => Some(value),
    }
}

/// Cabe na menor unidade da moeda sem arredondar (zeros à direita não contam).
pub fn fits_minor_units(amount: Decimal, minor_units: u32) -> bool {
    amount.normalize().scale() <= minor_units
}
