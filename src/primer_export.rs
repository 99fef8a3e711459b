//! Primer order-list export: plain text and CSV.

use crate::melting_temperature::{oligo_calc_tm, TmSettings};
use crate::primer_design::PrimerSet;
use anyhow::Result;
use itertools::Itertools;

/// One line of an order list.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PrimerRow {
    pub name: String,
    pub sequence: String,
}

/// Flattens primer sets into orderable rows. Row names follow the
/// `<operation><nr>[_vec]_fwd|_rev` scheme, e.g. `short_insertion1_fwd`
/// or `subcloning2_vec_rev`.
pub fn primer_rows(sets: &[PrimerSet]) -> Vec<PrimerRow> {
    let mut rows = vec![];
    for (i, set) in sets.iter().enumerate() {
        let base = set.title.to_lowercase().replace(' ', "_");
        for primer in &set.primers {
            let vector_suffix = if primer.name.contains("Vector") {
                "_vec"
            } else {
                ""
            };
            let direction = if primer.name.contains("Forward") {
                "fwd"
            } else {
                "rev"
            };
            rows.push(PrimerRow {
                name: format!("{}{}{}_{}", base, i + 1, vector_suffix, direction),
                sequence: primer.sequence(),
            });
        }
    }
    rows
}

/// CSV order list with a `Primer Name` / `Primer Sequence` header.
pub fn export_csv(sets: &[PrimerSet]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["Primer Name", "Primer Sequence"])?;
    for row in primer_rows(sets) {
        writer.write_record([row.name, row.sequence])?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Human-readable listing: one block per set with each primer's sequence
/// and a per-region length/Tm breakdown.
pub fn export_plain_text(sets: &[PrimerSet], settings: &TmSettings) -> String {
    sets.iter()
        .map(|set| {
            let primers = set
                .primers
                .iter()
                .map(|primer| {
                    let breakdown = primer
                        .regions
                        .iter()
                        .map(|region| {
                            format!(
                                "{:?}: {} bp, {:.0} °C",
                                region.kind,
                                region.sequence.len(),
                                oligo_calc_tm(region.sequence.as_bytes(), settings)
                            )
                        })
                        .join("; ");
                    format!(
                        "{}: {}\n({}; Total: {} bp)",
                        primer.name,
                        primer.sequence(),
                        breakdown,
                        primer.len()
                    )
                })
                .join("\n");
            format!("{}\n{}", set.title, primers)
        })
        .join("\n\n")
}
