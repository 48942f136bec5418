pub mod error;
pub mod types;

#[cfg(feature = "lending")]
pub mod lending;

#[cfg(feature = "maintenance")]
pub mod maintenance;

pub use error::FieldbookError;
pub use types::*;

/// Standard result type for all fieldbook operations
pub type FieldbookResult<T> = Result<T, FieldbookError>;
