//! # Unitwork Testkit
//!
//! Test utilities for Unitwork.
//!
//! This crate provides:
//! - A `Person` fixture entity and its class definition
//! - Recording and failing command handlers
//! - Property-based test generators using proptest
//! - Tracing initialisation for test runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use unitwork_testkit::prelude::*;
//!
//! #[test]
//! fn records_new_entities() {
//!     let recorder = RecordingHandler::new();
//!     let mut uow = unit_of_work(person_definition().new_handler(recorder.clone()));
//!     // ... register, mutate, commit
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod handlers;
pub mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::handlers::*;
    pub use crate::logging::*;
}

pub use fixtures::*;
pub use generators::*;
pub use handlers::*;
pub use logging::*;
