//! Per-segment annotation: focality and call for both alleles.

use crate::cna::call::{CnaCall, classify};
use crate::cna::distribution::CnaDistribution;
use crate::cna::focality::{Focality, evaluate};
use crate::cna::resolve_alleles;
use crate::input::SegmentRecord;

/// Focality statistics and call for one allelic copy number.
#[derive(Debug, Clone, Copy)]
pub struct AlleleAnnotation {
    /// The resolved copy number that was scored (after missing-value
    /// substitution).
    pub cn: f64,
    pub focality: f64,
    pub fraction_below: f64,
    pub fraction_above: f64,
    pub call: CnaCall,
}

/// Annotations for both alleles of one segment record.
#[derive(Debug, Clone, Copy)]
pub struct SegmentAnnotation {
    pub a1: AlleleAnnotation,
    pub a2: AlleleAnnotation,
}

fn annotate_allele(
    cn: f64,
    dist: &CnaDistribution,
) -> Result<AlleleAnnotation, Box<dyn std::error::Error>> {
    let Focality {
        fraction_below,
        fraction_above,
        focality,
    } = evaluate(cn, dist)?;

    Ok(AlleleAnnotation {
        cn,
        focality,
        fraction_below,
        fraction_above,
        call: classify(cn, focality),
    })
}

/// Annotate every segment of a sample against its distribution.
///
/// Missing allelic values go through the same [`resolve_alleles`] rule the
/// builder applied, so each lookup hits an observed level. Pure function of
/// its inputs; the output is ordered like `segments`.
pub fn annotate(
    segments: &[SegmentRecord],
    dist: &CnaDistribution,
) -> Result<Vec<SegmentAnnotation>, Box<dyn std::error::Error>> {
    segments
        .iter()
        .map(|seg| {
            let (a1, a2) = resolve_alleles(seg);
            Ok(SegmentAnnotation {
                a1: annotate_allele(a1, dist)?,
                a2: annotate_allele(a2, dist)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(
        chrom: &str,
        start: u64,
        end: u64,
        a1: Option<f64>,
        a2: Option<f64>,
        expected: f64,
    ) -> SegmentRecord {
        SegmentRecord {
            chromosome: chrom.to_string(),
            start,
            end,
            rescaled_cn_a1: a1,
            rescaled_cn_a2: a2,
            expected_total_cn: expected,
        }
    }

    #[test]
    fn test_annotates_both_alleles() {
        // a long neutral backbone plus one short segment with a focal
        // homozygous-deletion-range allele
        let segments = vec![
            segment("1", 1, 1_000_000, Some(2.0), Some(2.0), 4.0),
            segment("2", 1, 100, Some(0.1), Some(2.0), 2.1),
        ];
        let dist = CnaDistribution::build(&segments).unwrap();
        let annotations = annotate(&segments, &dist).unwrap();

        assert_eq!(annotations.len(), 2);

        let focal = &annotations[1];
        assert_eq!(focal.a1.cn, 0.1);
        assert_eq!(focal.a1.fraction_below, 0.0);
        assert!(focal.a1.focality > 0.995);
        assert_eq!(focal.a1.call, CnaCall::Del);

        assert_eq!(focal.a2.cn, 2.0);
        assert_eq!(focal.a2.call, CnaCall::None);

        // backbone alleles are the bulk of the genome, never focal
        assert_eq!(annotations[0].a1.call, CnaCall::None);
    }

    #[test]
    fn test_missing_values_resolve_to_observed_levels() {
        // the NA segment's substituted values (1.0, 2.0) must land on
        // levels the builder created from the same records
        let segments = vec![
            segment("1", 1, 1000, Some(1.0), Some(2.0), 3.0),
            segment("2", 1, 500, None, None, 3.0),
        ];
        let dist = CnaDistribution::build(&segments).unwrap();
        let annotations = annotate(&segments, &dist).unwrap();

        assert_eq!(annotations[1].a1.cn, 1.0);
        assert_eq!(annotations[1].a2.cn, 2.0);
    }

    #[test]
    fn test_foreign_value_fails() {
        let segments = vec![segment("1", 1, 100, Some(2.0), Some(2.0), 4.0)];
        let dist = CnaDistribution::build(&segments).unwrap();

        let foreign = vec![segment("1", 1, 100, Some(5.0), Some(2.0), 4.0)];
        let err = annotate(&foreign, &dist).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
