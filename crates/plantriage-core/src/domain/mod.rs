//! Domain models for plan triage.
//!
//! Canonical definitions for the records crossing the engine boundary:
//! - `Analysis` / `Bottleneck`: upstream analyzer output
//! - `Constraints`: caller-supplied cost limit
//! - `Verdict`: triage result

pub mod analysis;
pub mod constraints;
pub mod error;
pub mod verdict;

// Re-export main types and errors
pub use analysis::{Analysis, Bottleneck, Severity};
pub use constraints::{render_cost, Constraints};
pub use error::{Result, TriageError};
pub use verdict::{Priority, Verdict, VerdictStatus};
