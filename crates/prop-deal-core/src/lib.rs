pub mod config;
pub mod deal;
pub mod error;
pub mod financing;
pub mod market;
pub mod stamp_duty;
pub mod types;

pub use error::PropDealError;
pub use types::*;

/// Standard result type for all analyzer operations
pub type PropDealResult<T> = Result<T, PropDealError>;
