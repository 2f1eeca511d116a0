//! Per-sample processing and batch iteration over an input directory.
//!
//! Each sample is handled to completion before the next begins: read the
//! segment file, build the copy-number distribution, annotate every record,
//! write the outputs. Samples share no state, so the per-sample ordering
//! (distribution before any focality lookup) is the only constraint any
//! future parallel fan-out would have to preserve.

use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cna::{CnaDistribution, annotate};
use crate::input::read_seg_table;
use crate::output::{write_arm_summary, write_enriched};
use crate::utils::cytoband::CytobandMap;

/// Processes one annotated segment file at a time into an output directory,
/// optionally attaching cytoband/arm annotation.
pub struct SamplePipeline<'a> {
    output_dir: PathBuf,
    bands: Option<&'a CytobandMap>,
}

impl<'a> SamplePipeline<'a> {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            bands: None,
        }
    }

    pub fn with_bands(mut self, bands: Option<&'a CytobandMap>) -> Self {
        self.bands = bands;
        self
    }

    /// Process one sample file end to end. Any failure is fatal and carries
    /// the sample filename.
    pub fn process_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| format!("invalid input file name: {}", path.display()))?;

        let table = read_seg_table(path)?;
        let dist = CnaDistribution::build(&table.records)
            .map_err(|e| format!("{}: {}", file_name, e))?;
        info!(
            "{}: {} copy-number levels from {} segments ({} weighted bp)",
            file_name,
            dist.levels().len(),
            dist.segments_used(),
            dist.total_bp()
        );

        let annotations =
            annotate(&table.records, &dist).map_err(|e| format!("{}: {}", file_name, e))?;

        let band_assignments = match self.bands {
            Some(map) => Some(
                map.assign(&table.records)
                    .map_err(|e| format!("{}: {}", file_name, e))?,
            ),
            None => None,
        };

        let out_path = self.output_dir.join(format!("{}.cna_processed.tsv", file_name));
        let mut out = BufWriter::new(File::create(&out_path).map_err(|e| {
            std::io::Error::other(format!("Error creating {}: {}", out_path.display(), e))
        })?);
        write_enriched(&mut out, &table, &annotations, band_assignments.as_deref())
            .map_err(|e| format!("{}: {}", file_name, e))?;
        out.flush()?;

        if let Some(assignments) = &band_assignments {
            let summary_path = self
                .output_dir
                .join(format!("{}.cna_processed_arm_summary.tsv", file_name));
            let mut summary = BufWriter::new(File::create(&summary_path).map_err(|e| {
                std::io::Error::other(format!(
                    "Error creating {}: {}",
                    summary_path.display(),
                    e
                ))
            })?);
            write_arm_summary(&mut summary, &table.records, &annotations, assignments)?;
            summary.flush()?;
        }

        Ok(())
    }
}

/// Eligible inputs are files whose names end in `annotated`, the suffix the
/// upstream gene-annotation step leaves on its outputs. Sorted for a
/// deterministic batch order.
pub fn find_annotated_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        std::io::Error::other(format!("Error reading directory {}: {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && name.ends_with("annotated")
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Process every annotated segment file in `input_dir`. Aborts on the first
/// per-sample failure; returns the number of files processed.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    bands: Option<&CytobandMap>,
) -> Result<usize, Box<dyn std::error::Error>> {
    info!("Getting files in {}", input_dir.display());
    let files = find_annotated_files(input_dir)?;
    if files.is_empty() {
        return Err(format!(
            "no annotated segment files found in {}",
            input_dir.display()
        )
        .into());
    }
    info!("{} files found in {}", files.len(), input_dir.display());

    if !output_dir.exists() {
        info!("Creating output directory: {}", output_dir.display());
        fs::create_dir_all(output_dir)?;
    }

    let pipeline = SamplePipeline::new(output_dir).with_bands(bands);
    for (i, path) in files.iter().enumerate() {
        info!(
            "Processing file {} of {}: {}",
            i + 1,
            files.len(),
            path.file_name().and_then(|n| n.to_str()).unwrap_or("?")
        );
        pipeline.process_file(path)?;
    }

    info!("Processed {} files", files.len());
    Ok(files.len())
}
