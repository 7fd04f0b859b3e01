//! Test harness for fitment scenarios.
//!
//! Provides programmatic tools for scripting wheel/tire/vehicle
//! evaluations, verifying every result against independent checks, and
//! generating diagnostic output.
//!
//! # Key Components
//!
//! - [`FitmentBuilder`]: Fluent API for assembling and evaluating a fitment
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Structured text descriptions of a session result
//! - [`helpers`]: Spec fixtures, obstacle constructors, pose helpers
//! - [`assertions`]: Rich assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod report;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::FitmentReport;
pub use workflow::FitmentBuilder;
