pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::DcfError;
pub use types::*;

/// Standard result type for all DCF operations
pub type DcfResult<T> = Result<T, DcfError>;
