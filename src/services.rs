// src/services.rs

pub mod override_service;
pub mod pricing_service;
pub mod pricing_store;
pub mod tier_service;

pub use override_service::OverrideService;
pub use pricing_service::PricingService;
pub use pricing_store::{PricingSnapshot, PricingStore};
pub use tier_service::TierService;
