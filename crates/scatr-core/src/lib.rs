//! # scatr-core
//!
//! Expectation pragmas for regression-testing lint checkers.
//!
//! Checker fixtures are ordinary source files whose comments declare the
//! issues a checker is expected to raise:
//!
//! ```text
//! // scatr-ignore: E003
//! // [E001]: 5 "variable shadows import"
//! shadowed := fmt
//! call() // [E002]
//! ```
//!
//! This crate provides:
//!
//! - [`parse_pragma`] for the annotation mini-language
//! - [`File`] for extracting a line-to-[`Pragma`] table from a fixture
//! - [`CheckMode`] for the file-level `scatr-check` / `scatr-ignore` filter
//! - [`FixtureLoader`] for discovering fixtures on disk
//!
//! ## Example
//!
//! ```
//! use scatr_core::File;
//!
//! let file = File::new("shadow.go", "// [E001]: 5 \"bad\"\nx := 1\n", &["//"]);
//! let pragma = file.pragma_at(2).unwrap();
//! assert_eq!(pragma.issues("E001").unwrap()[0].column, 5);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod directive;
mod fixture;
mod language;
mod loader;
mod types;

pub mod pragma;

pub use config::{Config, ConfigError, FixturesConfig};
pub use directive::FileDirective;
pub use fixture::File;
pub use language::{Language, LanguageTable};
pub use loader::{FixtureLoader, FixtureLoaderBuilder, FixtureSet, LoadError, LoadedFixture};
pub use pragma::parse_pragma;
pub use types::{CheckMode, Issue, Pragma, ReportedIssue};
