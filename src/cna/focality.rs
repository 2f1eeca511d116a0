//! Focality scoring against the sample's copy-number distribution.

use crate::cna::distribution::CnaDistribution;

/// Genome fractions around one copy-number level and the derived focality.
#[derive(Debug, Clone, Copy)]
pub struct Focality {
    /// Fraction of weighted base pairs strictly below the level.
    pub fraction_below: f64,
    /// Fraction of weighted base pairs strictly above the level.
    pub fraction_above: f64,
    /// `1 - min(fraction_below, fraction_above)`: how small the affected
    /// slice of the genome is, seen from whichever side is tighter.
    pub focality: f64,
}

/// Score a copy-number value against the sample distribution.
///
/// The value must be a level the builder observed; anything else means the
/// evaluator and builder were fed different inputs, which is fatal.
pub fn evaluate(cn: f64, dist: &CnaDistribution) -> Result<Focality, Box<dyn std::error::Error>> {
    let level = dist
        .get(cn)
        .ok_or_else(|| format!("copy number {} not found in the sample distribution", cn))?;

    let fraction_below = level.fraction_below;
    let fraction_above = 1.0 - fraction_below - level.fraction;

    // On a tie the "above" side is the reported one; the focality value is
    // the same either way.
    let focality = if fraction_below < fraction_above {
        1.0 - fraction_below
    } else {
        1.0 - fraction_above
    };

    Ok(Focality {
        fraction_below,
        fraction_above,
        focality,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::SegmentRecord;

    fn segment(start: u64, end: u64, a1: f64, a2: f64) -> SegmentRecord {
        SegmentRecord {
            chromosome: "1".to_string(),
            start,
            end,
            rescaled_cn_a1: Some(a1),
            rescaled_cn_a2: Some(a2),
            expected_total_cn: 2.0,
        }
    }

    fn scenario() -> CnaDistribution {
        // levels 0.1 (25%), 1.9 (25%), 2.0 (50%)
        let segments = vec![segment(1, 100, 0.1, 1.9), segment(101, 200, 2.0, 2.0)];
        CnaDistribution::build(&segments).unwrap()
    }

    #[test]
    fn test_low_outlier_is_focal() {
        let f = evaluate(0.1, &scenario()).unwrap();
        assert_eq!(f.fraction_below, 0.0);
        assert_eq!(f.fraction_above, 0.75);
        assert_eq!(f.focality, 1.0);
    }

    #[test]
    fn test_top_level_has_nothing_above() {
        let f = evaluate(2.0, &scenario()).unwrap();
        assert_eq!(f.fraction_below, 0.5);
        assert!(f.fraction_above.abs() < 1e-12);
        assert!((f.focality - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fraction_monotonicity() {
        let dist = scenario();
        let mut prev_below = -1.0;
        let mut prev_above = 2.0;
        for level in dist.levels() {
            let f = evaluate(level.cn, &dist).unwrap();
            assert!(f.fraction_below >= prev_below);
            assert!(f.fraction_above <= prev_above);
            prev_below = f.fraction_below;
            prev_above = f.fraction_above;
        }
    }

    #[test]
    fn test_tie_between_sides() {
        // levels 1.0 (25%), 2.0 (50%), 3.0 (25%): the middle level sees
        // equal fractions on both sides
        let segments = vec![
            segment(1, 50, 1.0, 1.0),
            segment(51, 150, 2.0, 2.0),
            segment(151, 200, 3.0, 3.0),
        ];
        let dist = CnaDistribution::build(&segments).unwrap();
        let f = evaluate(2.0, &dist).unwrap();
        assert_eq!(f.fraction_below, 0.25);
        assert_eq!(f.fraction_above, 0.25);
        assert_eq!(f.focality, 0.75);
    }

    #[test]
    fn test_unknown_value_is_fatal() {
        let err = evaluate(7.7, &scenario()).unwrap_err();
        assert!(err.to_string().contains("7.7"));
        assert!(err.to_string().contains("not found"));
    }
}
