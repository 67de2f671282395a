//! Fair-share split allocation.
//!
//! Splits a transaction total among participants (equal, weighted shares or
//! custom amounts) so that the per-person amounts sum to the total to the last
//! minor unit.

pub mod converter;
pub mod distributor;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;
pub mod weights;

#[cfg(test)]
mod props;

pub use converter::MinorUnitConverter;
pub use distributor::FairDistributor;
pub use error::{ConversionError, DistributionError, SplitError};
pub use service::SplitService;
pub use types::{
    AllocationLine, Participant, PerPersonAllocation, SplitMode, SplitPayload, SplitRequest,
    SplitSelection,
};
pub use validation::{CUSTOM_TOLERANCE_MINOR, SplitValidator};
pub use weights::{WeightAllocator, Weights};
