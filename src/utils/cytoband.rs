//! Cytogenetic band lookup from a UCSC-style cytoband table.
//!
//! The table is tab-delimited (`chr1  0  2300000  p36.33  gneg`); only the
//! chromosome, start, and band columns are used. The table path is supplied
//! on the command line; nothing is resolved relative to the executable.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::input::SegmentRecord;

/// One cytogenetic band on a chromosome.
#[derive(Debug, Clone)]
pub struct Band {
    pub start: u64,
    pub name: String,
    /// First character of the band label: `p` or `q`.
    pub arm: char,
}

/// Band and arm assigned to one segment record.
#[derive(Debug, Clone)]
pub struct BandAssignment {
    pub band: String,
    pub arm: char,
}

/// Per-chromosome band intervals, sorted by start for positional lookup.
#[derive(Debug, Clone)]
pub struct CytobandMap {
    bands: HashMap<String, Vec<Band>>,
}

/// Chromosome tokens in segment files come without the `chr` prefix the
/// table uses; accept both.
fn chrom_key(chromosome: &str) -> String {
    let bare = chromosome.strip_prefix("chr").unwrap_or(chromosome);
    format!("chr{}", bare)
}

impl CytobandMap {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path).map_err(|e| {
            std::io::Error::other(format!(
                "Error opening cytoband table {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_reader(BufReader::new(file))
            .map_err(|e| format!("{}: {}", path.display(), e).into())
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Box<dyn std::error::Error>> {
        let mut bands: HashMap<String, Vec<Band>> = HashMap::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 4 {
                return Err(format!(
                    "Malformed cytoband line {} (expected at least 4 columns, got {}): {}",
                    i + 1,
                    parts.len(),
                    line
                )
                .into());
            }

            let start: u64 = parts[1]
                .trim()
                .parse()
                .map_err(|e| format!("Invalid band start at line {}: {}", i + 1, e))?;
            let name = parts[3].trim().to_string();
            let arm = name
                .chars()
                .next()
                .ok_or_else(|| format!("Empty band name at line {}", i + 1))?;

            bands
                .entry(chrom_key(parts[0].trim()))
                .or_default()
                .push(Band { start, name, arm });
        }

        if bands.is_empty() {
            return Err("cytoband table contains no bands".into());
        }

        for chrom_bands in bands.values_mut() {
            chrom_bands.sort_by_key(|b| b.start);
        }

        Ok(Self { bands })
    }

    /// Band whose start is the greatest start `<=` the position, on the
    /// given chromosome. `None` when the chromosome is not in the table or
    /// the position precedes the first band.
    pub fn lookup(&self, chromosome: &str, position: u64) -> Option<&Band> {
        let chrom_bands = self.bands.get(&chrom_key(chromosome))?;
        let idx = chrom_bands.partition_point(|b| b.start <= position);
        if idx == 0 { None } else { Some(&chrom_bands[idx - 1]) }
    }

    /// Assign a band and arm to every segment, keyed on its start position.
    pub fn assign(
        &self,
        segments: &[SegmentRecord],
    ) -> Result<Vec<BandAssignment>, Box<dyn std::error::Error>> {
        segments
            .iter()
            .map(|seg| {
                let band = self.lookup(&seg.chromosome, seg.start).ok_or_else(|| {
                    format!(
                        "no cytoband for chromosome {} position {}",
                        seg.chromosome, seg.start
                    )
                })?;
                Ok(BandAssignment {
                    band: band.name.clone(),
                    arm: band.arm,
                })
            })
            .collect()
    }

    pub fn band_count(&self) -> usize {
        self.bands.values().map(|v| v.len()).sum()
    }

    pub fn chromosome_count(&self) -> usize {
        self.bands.len()
    }
}
