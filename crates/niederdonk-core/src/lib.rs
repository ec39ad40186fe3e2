pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "pro_forma")]
pub mod pro_forma;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::NiederdonkError;
pub use types::*;

/// Standard result type for all financial-model operations
pub type NiederdonkResult<T> = Result<T, NiederdonkError>;
