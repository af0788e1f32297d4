// src/db.rs

pub mod tier_repo;
pub use tier_repo::TierRepository;
pub mod override_repo;
pub use override_repo::OverrideRepository;
pub mod vendor_repo;
pub use vendor_repo::VendorRepository;
pub mod booking_repo;
pub use booking_repo::BookingRepository;

pub mod pricing_store;
pub use pricing_store::PgPricingStore;
