//! Threshold rules turning a (copy number, focality) pair into a call.

use std::fmt;

// Decision boundaries calibrated in Brastianos, Carter et al.,
// Cancer Discovery 2015. Not reconfigurable.
const DEL_CN_CEILING: f64 = 0.25;
const DEL_FOCALITY_FLOOR: f64 = 0.995;
const FOCALITY_BASELINE: f64 = 0.98;
const HIGH_AMP_SLOPE: f64 = 1.0 / 7.0;
const HIGH_AMP_PIVOT_CN: f64 = 7.0;
const AMP_SLOPE: f64 = 0.2;
const AMP_PIVOT_CN: f64 = 5.0;

/// Categorical copy-number call for one allele of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CnaCall {
    Del,
    HighAmp,
    Amp,
    None,
}

impl CnaCall {
    /// Output label, as written to the processed files.
    pub fn label(&self) -> &'static str {
        match self {
            CnaCall::Del => "del",
            CnaCall::HighAmp => "high amp",
            CnaCall::Amp => "amp",
            CnaCall::None => "none",
        }
    }

    pub fn is_event(&self) -> bool {
        !matches!(self, CnaCall::None)
    }
}

impl fmt::Display for CnaCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify one allelic copy number given its focality. First match wins.
///
/// At `cn == 0` the log term is `-inf`, so both amplification thresholds
/// evaluate to `+inf` and can never be met: a zero copy number only ever
/// calls as a deletion (when focal) or as no event.
pub fn classify(cn: f64, focality: f64) -> CnaCall {
    if cn < DEL_CN_CEILING && focality > DEL_FOCALITY_FLOOR {
        return CnaCall::Del;
    }

    if focality > FOCALITY_BASELINE - HIGH_AMP_SLOPE * (cn / HIGH_AMP_PIVOT_CN).log2() {
        return CnaCall::HighAmp;
    }

    if focality > FOCALITY_BASELINE - AMP_SLOPE * (cn / AMP_PIVOT_CN).log2() {
        return CnaCall::Amp;
    }

    CnaCall::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletion_boundary() {
        assert_eq!(classify(0.2, 0.999), CnaCall::Del);
        // copy number not below 0.25
        assert_ne!(classify(0.3, 0.999), CnaCall::Del);
        // not focal enough
        assert_eq!(classify(0.2, 0.995), CnaCall::None);
    }

    #[test]
    fn test_deletion_takes_priority() {
        // a focality this large also clears both amplification thresholds
        // at cn 0.2; first-match-wins must still resolve to del
        assert_eq!(classify(0.2, 2.0), CnaCall::Del);
    }

    #[test]
    fn test_high_amp() {
        // threshold at cn 10 is 0.98 - (1/7)*log2(10/7) ~= 0.9065
        assert_eq!(classify(10.0, 0.95), CnaCall::HighAmp);
        // below the high-amp line the same copy number is an ordinary amp
        assert_eq!(classify(10.0, 0.90), CnaCall::Amp);
    }

    #[test]
    fn test_amp_below_high_amp_threshold() {
        // cn 6: high-amp threshold ~= 1.012 (unreachable), amp ~= 0.9274
        assert_eq!(classify(6.0, 0.95), CnaCall::Amp);
        assert_eq!(classify(6.0, 0.92), CnaCall::None);
    }

    #[test]
    fn test_zero_copy_number_never_amplifies() {
        assert_eq!(classify(0.0, 0.999), CnaCall::Del);
        assert_eq!(classify(0.0, 0.9), CnaCall::None);
    }

    #[test]
    fn test_neutral_copy_number() {
        assert_eq!(classify(2.0, 0.5), CnaCall::None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(CnaCall::Del.to_string(), "del");
        assert_eq!(CnaCall::HighAmp.to_string(), "high amp");
        assert_eq!(CnaCall::Amp.to_string(), "amp");
        assert_eq!(CnaCall::None.to_string(), "none");
        assert!(CnaCall::Amp.is_event());
        assert!(!CnaCall::None.is_event());
    }
}
