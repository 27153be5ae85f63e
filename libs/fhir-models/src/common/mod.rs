//! Version-agnostic FHIR models
//!
//! Types that work across FHIR R4, R4B, and R5

pub mod code_system;
pub mod complex;
pub mod error;

// Re-export commonly used types
pub use code_system::*;
pub use complex::PublicationStatus;
pub use error::{Error, Result};
