//! Base-pair-weighted empirical distribution of rescaled copy numbers.

use indexmap::IndexMap;
use log::debug;
use std::collections::{HashMap, HashSet};

use crate::cna::resolve_alleles;
use crate::input::SegmentRecord;

/// One distinct observed copy-number level.
#[derive(Debug, Clone, Copy)]
pub struct CnLevel {
    pub cn: f64,
    /// Base pairs accumulated at this level, one contribution per allele
    /// occurrence across the genome.
    pub bp: u64,
    /// This level's share of the total weighted base pairs.
    pub fraction: f64,
    /// Cumulative share of weighted base pairs strictly below this level.
    pub fraction_below: f64,
}

/// The empirical distribution for one sample: distinct copy-number levels in
/// ascending order, each with its genome fraction and the cumulative
/// fraction below it.
///
/// Levels are keyed by the canonical bit pattern of the copy-number value
/// (`-0.0` normalized to `0.0`), so lookups are exact: the value queried
/// must be one the builder observed.
#[derive(Debug, Clone)]
pub struct CnaDistribution {
    levels: Vec<CnLevel>,
    index: HashMap<u64, usize>,
    total_bp: u64,
    segments_used: usize,
}

/// Canonical map key for a copy-number value.
pub(crate) fn cn_key(cn: f64) -> u64 {
    if cn == 0.0 { 0f64.to_bits() } else { cn.to_bits() }
}

impl CnaDistribution {
    /// Build the distribution from every segment of one sample.
    ///
    /// A `(chromosome, start, end)` interval contributes its length to both
    /// allele buckets exactly once, no matter how many gene rows repeat it.
    pub fn build(segments: &[SegmentRecord]) -> Result<Self, Box<dyn std::error::Error>> {
        let mut seen: HashSet<(&str, u64, u64)> = HashSet::new();
        let mut buckets: IndexMap<u64, u64> = IndexMap::new();
        let mut total_bp: u64 = 0;
        let mut segments_used = 0usize;

        for seg in segments {
            if !seen.insert((seg.chromosome.as_str(), seg.start, seg.end)) {
                continue;
            }

            let (a1, a2) = resolve_alleles(seg);
            let len = seg.end - seg.start + 1;
            *buckets.entry(cn_key(a1)).or_insert(0) += len;
            *buckets.entry(cn_key(a2)).or_insert(0) += len;
            total_bp += 2 * len;
            segments_used += 1;
        }

        if total_bp == 0 {
            return Err("no usable segments, copy-number distribution is empty".into());
        }

        let mut keys: Vec<u64> = buckets.keys().copied().collect();
        keys.sort_by(|a, b| {
            f64::from_bits(*a)
                .partial_cmp(&f64::from_bits(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut levels = Vec::with_capacity(keys.len());
        let mut index = HashMap::with_capacity(keys.len());
        let mut fraction_below = 0.0;
        for key in keys {
            let cn = f64::from_bits(key);
            let bp = buckets[&key];
            let fraction = bp as f64 / total_bp as f64;
            debug!(
                "loading copy number {}: fraction_below {:.6}, fraction {:.6}",
                cn, fraction_below, fraction
            );
            index.insert(key, levels.len());
            levels.push(CnLevel {
                cn,
                bp,
                fraction,
                fraction_below,
            });
            fraction_below += fraction;
        }

        debug!(
            "{} distinct copy-number levels from {} segments ({} weighted bp)",
            levels.len(),
            segments_used,
            total_bp
        );

        Ok(Self {
            levels,
            index,
            total_bp,
            segments_used,
        })
    }

    /// Look up the level for an exact copy-number value.
    pub fn get(&self, cn: f64) -> Option<&CnLevel> {
        self.index.get(&cn_key(cn)).map(|&i| &self.levels[i])
    }

    /// All levels in ascending copy-number order.
    pub fn levels(&self) -> &[CnLevel] {
        &self.levels
    }

    pub fn total_bp(&self) -> u64 {
        self.total_bp
    }

    /// Number of distinct intervals that contributed weight.
    pub fn segments_used(&self) -> usize {
        self.segments_used
    }
}
