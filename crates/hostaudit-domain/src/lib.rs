//! Pure rule evaluation (no IO).
//!
//! Input: a rule definition and the captured output of its command.
//! Output: a verdict. Host reports and the run summary are folded from verdicts here too.

#![forbid(unsafe_code)]

pub mod model;
pub mod policy;
pub mod report;

mod comparisons;
mod engine;

pub use engine::{error_verdict, evaluate};

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;
