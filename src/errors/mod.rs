//! Centralized error handling for the stream curator
//!
//! # Error Categories
//!
//! - **Configuration / input errors**: abort the run before any output is written
//! - **Source errors**: a playlist source could not be fetched or read; the source is skipped
//! - **Probe errors**: a candidate could not be probed; the candidate is rejected
//!
//! # Usage
//!
//! ```rust
//! use stream_curator::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("min_width must be positive"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for Probe Results
pub type ProbeResult<T> = Result<T, ProbeError>;
