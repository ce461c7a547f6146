//! Domain services

pub mod consensus;
pub mod pricing;
pub mod volume;

pub use consensus::{percent_difference, reconcile, ConsensusResult, VARIANCE_TOLERANCE};
pub use pricing::{derive_quote, price_range, LoadSize, PriceBand, Quote, PRICE_BANDS};
pub use volume::{ceil_to_tenth, format_volume, volume_cubic_yards, CUBIC_FEET_PER_CUBIC_YARD};
