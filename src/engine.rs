// src/engine.rs
//
// Motor de comissão e tiers. Tudo aqui é cálculo puro sobre um snapshot
// lido do banco, exceto a varredura de tiers manuais expirados, que recebe
// o armazenamento por trait.

pub mod calculator;
pub mod error;
pub mod manual_tier;
pub mod money;
pub mod service_override;
pub mod tier_catalog;
pub mod tier_resolver;

pub use calculator::{EngineSettings, PricingEngine};
pub use error::{PricingError, StoreError};
pub use manual_tier::{
    effective_tier, recompute_assignment, sweep_expired_manual_tiers, EffectiveTier,
    ManualTierStore, SweepError, SweepReport, TierAssignment, TierSource,
};
pub use service_override::active_override_for;
pub use tier_catalog::TierCatalog;
pub use tier_resolver::{is_eligible, resolve_automatic_tier, DEFAULT_FALLBACK_TIER};

#[cfg(test)]
pub(crate) mod fixtures;
