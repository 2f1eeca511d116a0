//! Annotated segment file input.
//!
//! Reads the tab-delimited, gene-annotated segment files produced by the
//! upstream segmentation pipeline. The core fields (`chr`, `start`, `end`,
//! `rescaled.cn.a1`, `rescaled.cn.a2`, `expected_total_cn`) are parsed into
//! [`SegmentRecord`]s; every other column is carried along verbatim so it
//! survives to output unchanged.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One genomic interval for one sample, as seen by the calling core.
#[derive(Debug, Clone)]
pub struct SegmentRecord {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    /// Allele-specific rescaled copy numbers. Absent when probe coverage was
    /// too thin for the upstream inference to rescale this segment.
    pub rescaled_cn_a1: Option<f64>,
    pub rescaled_cn_a2: Option<f64>,
    /// Fallback total copy number, always present.
    pub expected_total_cn: f64,
}

/// A fully-read segment file: header, raw rows, and the parsed records.
///
/// `rows` and `records` are parallel: `records[i]` was parsed from
/// `rows[i]`. The raw rows keep the passthrough columns exactly as they
/// appeared in the input.
#[derive(Debug)]
pub struct SegTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub records: Vec<SegmentRecord>,
}

impl SegTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

struct CoreColumns {
    chromosome: usize,
    start: usize,
    end: usize,
    a1: usize,
    a2: usize,
    expected: usize,
}

fn resolve_core_columns(columns: &[String]) -> Result<CoreColumns, Box<dyn std::error::Error>> {
    let find = |name: &str| {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| format!("missing required column '{}'", name))
    };
    Ok(CoreColumns {
        chromosome: find("chr")?,
        start: find("start")?,
        end: find("end")?,
        a1: find("rescaled.cn.a1")?,
        a2: find("rescaled.cn.a2")?,
        expected: find("expected_total_cn")?,
    })
}

/// Parse a copy-number field. Empty fields and `NA`/`NaN` sentinels are
/// missing values, not errors.
fn parse_cn(field: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let t = field.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("na") || t.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    t.parse::<f64>().map(Some)
}

fn parse_record(
    fields: &[String],
    cols: &CoreColumns,
    line_no: usize,
) -> Result<SegmentRecord, Box<dyn std::error::Error>> {
    let start: u64 = fields[cols.start]
        .trim()
        .parse()
        .map_err(|e| format!("Invalid start at line {}: {}", line_no, e))?;
    let end: u64 = fields[cols.end]
        .trim()
        .parse()
        .map_err(|e| format!("Invalid end at line {}: {}", line_no, e))?;
    if end < start {
        return Err(format!(
            "Segment end precedes start at line {} ({} < {})",
            line_no, end, start
        )
        .into());
    }

    let rescaled_cn_a1 = parse_cn(&fields[cols.a1])
        .map_err(|e| format!("Invalid rescaled.cn.a1 at line {}: {}", line_no, e))?;
    let rescaled_cn_a2 = parse_cn(&fields[cols.a2])
        .map_err(|e| format!("Invalid rescaled.cn.a2 at line {}: {}", line_no, e))?;
    let expected_total_cn = parse_cn(&fields[cols.expected])
        .map_err(|e| format!("Invalid expected_total_cn at line {}: {}", line_no, e))?
        .ok_or_else(|| format!("Missing expected_total_cn at line {}", line_no))?;

    Ok(SegmentRecord {
        chromosome: fields[cols.chromosome].trim().to_string(),
        start,
        end,
        rescaled_cn_a1,
        rescaled_cn_a2,
        expected_total_cn,
    })
}

pub fn read_seg_table(path: &Path) -> Result<SegTable, Box<dyn std::error::Error>> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::other(format!("Error opening segment file {}: {}", path.display(), e))
    })?;
    read_seg_table_from_reader(BufReader::new(file))
        .map_err(|e| format!("{}: {}", path.display(), e).into())
}

pub fn read_seg_table_from_reader<R: BufRead>(
    reader: R,
) -> Result<SegTable, Box<dyn std::error::Error>> {
    let mut header: Option<(Vec<String>, CoreColumns)> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut records: Vec<SegmentRecord> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<String> = line.split('\t').map(|f| f.to_string()).collect();
        match &header {
            None => {
                let cols = resolve_core_columns(&fields)?;
                header = Some((fields, cols));
            }
            Some((columns, cols)) => {
                if fields.len() != columns.len() {
                    return Err(format!(
                        "Malformed segment line {} (expected {} columns, got {}): {}",
                        i + 1,
                        columns.len(),
                        fields.len(),
                        line
                    )
                    .into());
                }
                records.push(parse_record(&fields, cols, i + 1)?);
                rows.push(fields);
            }
        }
    }

    let (columns, _) = header.ok_or("segment file has no header line")?;
    Ok(SegTable {
        columns,
        rows,
        records,
    })
}
