//! Tab-delimited output for enriched segment records and arm summaries.

use std::collections::BTreeSet;
use std::io::Write;

use crate::cna::{CnaCall, SegmentAnnotation};
use crate::input::{SegTable, SegmentRecord};
use crate::utils::cytoband::BandAssignment;

/// Passthrough columns, in their fixed output order. All must be present in
/// the input.
pub const PASSTHROUGH_COLUMNS: [&str; 14] = [
    "genes",
    "chr",
    "start",
    "start_gene",
    "start_exon",
    "end",
    "end_gene",
    "segment_end_exon",
    "Num_Probes",
    "sample",
    "modal_total_cn",
    "expected_total_cn",
    "rescaled.cn.a1",
    "rescaled.cn.a2",
];

const CALL_COLUMNS: [&str; 8] = [
    "focality_1",
    "focality_2",
    "called_CNA1",
    "called_CNA2",
    "fr_below_1",
    "fr_above_1",
    "fr_below_2",
    "fr_above_2",
];

/// Write the enriched per-gene table: passthrough columns in fixed order,
/// then the per-allele focality and call columns, then `band`/`arm` when a
/// band assignment is given.
pub fn write_enriched<W: Write>(
    w: &mut W,
    table: &SegTable,
    annotations: &[SegmentAnnotation],
    bands: Option<&[BandAssignment]>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut passthrough_idx = Vec::with_capacity(PASSTHROUGH_COLUMNS.len());
    for col in PASSTHROUGH_COLUMNS {
        let idx = table
            .column_index(col)
            .ok_or_else(|| format!("missing required output column '{}'", col))?;
        passthrough_idx.push(idx);
    }

    let mut header: Vec<&str> = Vec::new();
    header.extend(PASSTHROUGH_COLUMNS);
    header.extend(CALL_COLUMNS);
    if bands.is_some() {
        header.push("band");
        header.push("arm");
    }
    writeln!(w, "{}", header.join("\t"))?;

    for (i, (row, ann)) in table.rows.iter().zip(annotations).enumerate() {
        let mut fields: Vec<String> = Vec::with_capacity(header.len());
        for &idx in &passthrough_idx {
            fields.push(row[idx].clone());
        }
        fields.push(ann.a1.focality.to_string());
        fields.push(ann.a2.focality.to_string());
        fields.push(ann.a1.call.to_string());
        fields.push(ann.a2.call.to_string());
        fields.push(ann.a1.fraction_below.to_string());
        fields.push(ann.a1.fraction_above.to_string());
        fields.push(ann.a2.fraction_below.to_string());
        fields.push(ann.a2.fraction_above.to_string());
        if let Some(assignments) = bands {
            fields.push(assignments[i].band.clone());
            fields.push(assignments[i].arm.to_string());
        }
        writeln!(w, "{}", fields.join("\t"))?;
    }

    Ok(())
}

/// Write the per-arm event summary: one row per distinct
/// `(call type, chrom+arm, chrom+band)`, no header. Repeated gene-level
/// calls within one band collapse to a single row; rows are sorted within
/// each call type.
pub fn write_arm_summary<W: Write>(
    w: &mut W,
    records: &[SegmentRecord],
    annotations: &[SegmentAnnotation],
    bands: &[BandAssignment],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut amp: BTreeSet<(String, String)> = BTreeSet::new();
    let mut high_amp: BTreeSet<(String, String)> = BTreeSet::new();
    let mut del: BTreeSet<(String, String)> = BTreeSet::new();

    for ((rec, ann), assignment) in records.iter().zip(annotations).zip(bands) {
        for call in [ann.a1.call, ann.a2.call] {
            let set = match call {
                CnaCall::Amp => &mut amp,
                CnaCall::HighAmp => &mut high_amp,
                CnaCall::Del => &mut del,
                CnaCall::None => continue,
            };
            set.insert((
                format!("{}{}", rec.chromosome, assignment.arm),
                format!("{}{}", rec.chromosome, assignment.band),
            ));
        }
    }

    let groups = [
        (CnaCall::Amp, &amp),
        (CnaCall::HighAmp, &high_amp),
        (CnaCall::Del, &del),
    ];
    for (call, sections) in groups {
        for (arm, band) in sections {
            writeln!(w, "{}\t{}\t{}", call, arm, band)?;
        }
    }

    Ok(())
}
