//! Product pricing

pub mod quote;
pub mod tiers;

pub use quote::compute_quote;
pub use tiers::validate_tiers;
