//! Copy-number alteration calling core.
//!
//! The pipeline for one sample: build a [`CnaDistribution`] over every
//! segment in the file, then score each segment's two allelic copy numbers
//! against it ([`evaluate`]) and classify the result ([`classify`]). The
//! distribution must be complete before any focality lookup; both stages
//! see the same records, so every value the annotator queries was observed
//! by the builder.

pub mod annotate;
pub mod call;
pub mod distribution;
pub mod focality;

pub use annotate::{AlleleAnnotation, SegmentAnnotation, annotate};
pub use call::{CnaCall, classify};
pub use distribution::{CnLevel, CnaDistribution};
pub use focality::{Focality, evaluate};

use crate::input::SegmentRecord;

/// Resolve a segment's allelic copy numbers, substituting for missing values.
///
/// When either rescaled value is absent (too few probes for the upstream
/// inference), both are rederived from `expected_total_cn`: allele 1 becomes
/// 1.0 for an expected total of 2 or more, otherwise 0.0, and allele 2 takes
/// the remainder. The uneven split keeps low-confidence segments registering
/// as focal events instead of diluting them into an even background.
///
/// Both the distribution builder and the annotator call this one function,
/// so a substituted value always lands on a level the builder created.
pub fn resolve_alleles(record: &SegmentRecord) -> (f64, f64) {
    if let (Some(a1), Some(a2)) = (record.rescaled_cn_a1, record.rescaled_cn_a2) {
        (a1, a2)
    } else {
        let a1 = if record.expected_total_cn >= 2.0 { 1.0 } else { 0.0 };
        (a1, record.expected_total_cn - a1)
    }
}
