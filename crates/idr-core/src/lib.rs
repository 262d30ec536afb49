pub mod config;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "idr")]
pub mod projector;

#[cfg(feature = "pslf")]
pub mod pslf;

pub use error::ProjectorError;
pub use types::*;

/// Standard result type for all projector operations
pub type ProjectorResult<T> = Result<T, ProjectorError>;
