// src/models.rs

pub mod booking;
pub mod pricing;
pub mod vendor;
