//! FHIR terminology models
//!
//! Strongly-typed Rust structures for the terminology resources edited by the
//! admin console.
//!
//! # Module Organization
//!
//! - `common`: Version-agnostic models that work across FHIR R4, R4B, and R5
//!
//! # Example
//!
//! ```rust
//! use termadmin_models::common::{CodeSystem, CodeSystemContentMode};
//! use serde_json::json;
//!
//! let cs: CodeSystem = serde_json::from_value(json!({
//!     "resourceType": "CodeSystem",
//!     "url": "http://example.org/fhir/CodeSystem/colors",
//!     "name": "Colors",
//!     "status": "active",
//!     "content": "complete",
//!     "concept": [
//!         { "code": "warm", "concept": [{ "code": "red" }, { "code": "orange" }] }
//!     ]
//! }))
//! .unwrap();
//!
//! assert_eq!(cs.content, CodeSystemContentMode::Complete);
//! assert_eq!(cs.concept[0].children.len(), 2);
//! assert_eq!(cs.concept_count(), 3);
//! ```

pub mod common;

// Re-export commonly used types
pub use common::*;
