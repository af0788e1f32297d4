// src/handlers.rs

pub mod overrides;
pub mod pricing;
pub mod tiers;
pub mod vendors;
