//! Gene-level copy-number alteration calling from ABSOLUTE-style annotated
//! segment files.
//!
//! For each sample, a base-pair-weighted empirical distribution of rescaled
//! copy numbers is built across the whole genome, every allelic copy-number
//! value is scored for focality against it, and log-scaled threshold rules
//! turn each (copy number, focality) pair into a categorical call: `del`,
//! `amp`, `high amp`, or `none`.

pub mod cna;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod utils;
