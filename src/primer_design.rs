//! Primer set generation for insertion, deletion and mutation edits.
//!
//! A primer is assembled from up to three functional regions:
//!
//! ```text
//!              homologous region  insertion      template binding region
//!                           |         |            |
//!                   ┏---------------┓┏-┓┏------------------------┓
//!                   TTATATATGGGGAAAAAATGTTTATATATGGGGAAAAAAAATTTA
//! top    GGGGAAAAAAAATTTATATATGGGGAAAAAAAATTTATATATGGGGAAAAAAAATT
//! ```
//!
//! Template-binding regions anneal to the unedited plasmid and are sized
//! against the configured algorithm; homologous regions drive the
//! homology-directed assembly of the edit and are always sized with the
//! simplified GC-count formula. Whether the insert itself can serve as
//! the overlap (long path) or flanking plasmid bases must be borrowed
//! (short path) is decided by the insert's own melting temperature.

use crate::dna_sequence::{sanitize_dna_input, EditSpan, Plasmid};
use crate::error::DesignError;
use crate::iupac_code::reverse_complement;
use crate::melting_temperature::{oligo_calc_tm, TmAlgorithm, TmSettings};
use crate::primer_extension::{extend_primer, trim_homology, GrowthDirection, Strand, TrimMode};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Minimum template-binding length; below this the Tm formulas degenerate.
const TBR_MIN_LENGTH: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Insertion,
    Deletion,
    Mutation,
    Subcloning,
}

impl OperationType {
    pub fn label(&self) -> &'static str {
        match self {
            OperationType::Insertion => "Insertion",
            OperationType::Deletion => "Deletion",
            OperationType::Mutation => "Mutation",
            OperationType::Subcloning => "Subcloning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Functional role of a primer region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Homology,
    Insert,
    TemplateBinding,
    SubcloningHomology,
    SubcloningTemplateBinding,
}

/// One contiguous piece of a primer's final 5'->3' sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimerRegion {
    pub sequence: String,
    pub kind: RegionKind,
    /// 1-based plasmid coordinate the region was anchored at, if it was
    /// derived from the plasmid rather than from the insert.
    pub start: Option<usize>,
    pub direction: Direction,
}

impl PrimerRegion {
    fn new(sequence: Vec<u8>, kind: RegionKind, start: Option<usize>, direction: Direction) -> Self {
        Self {
            sequence: String::from_utf8_lossy(&sequence).into_owned(),
            kind,
            start,
            direction,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primer {
    pub name: String,
    pub regions: Vec<PrimerRegion>,
}

impl Primer {
    fn new(name: &str, regions: Vec<PrimerRegion>) -> Self {
        // Zero-length regions carry no information, drop them.
        let regions = regions
            .into_iter()
            .filter(|r| !r.sequence.is_empty())
            .collect();
        Self {
            name: name.to_string(),
            regions,
        }
    }

    /// The full 5'->3' primer sequence.
    pub fn sequence(&self) -> String {
        self.regions.iter().map(|r| r.sequence.as_str()).join("")
    }

    pub fn len(&self) -> usize {
        self.regions.iter().map(|r| r.sequence.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symmetry {
    Symmetric,
    Asymmetric,
}

/// The result of one design request. `hr_length`/`hr_tm` hold one entry
/// per junction: one for simple edits, two (5' then 3') for subcloning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimerSet {
    pub title: String,
    pub operation: OperationType,
    pub symmetry: Symmetry,
    pub hr_length: Vec<usize>,
    pub hr_tm: Vec<f64>,
    pub resulting_sequence: String,
    pub primers: Vec<Primer>,
}

/// Tunable design parameters. Defaults match common wet-lab practice for
/// single-fragment homology cloning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignPreferences {
    /// Target Tm for template-binding regions.
    pub tbr_tm: f64,
    /// Target Tm for homologous regions.
    pub hr_tm: f64,
    /// Target Tm for homologous regions of subcloning primers.
    pub hr_subcloning_tm: f64,
    /// Minimum length of a homologous region.
    pub hr_min_length: usize,
    /// Inserts whose own Tm stays below this are treated as short.
    pub max_tm_si: f64,
    /// Distribute the overlap across both primers instead of loading it
    /// all onto the forward primer.
    pub symmetric_primers: bool,
    /// Algorithm for template-binding regions. Homologous regions always
    /// use the simplified GC-count formula.
    pub tm_algorithm: TmAlgorithm,
    pub tm_settings: TmSettings,
}

impl Default for DesignPreferences {
    fn default() -> Self {
        Self {
            tbr_tm: 60.0,
            hr_tm: 50.0,
            hr_subcloning_tm: 55.0,
            hr_min_length: 18,
            max_tm_si: 49.5,
            symmetric_primers: true,
            tm_algorithm: TmAlgorithm::default(),
            tm_settings: TmSettings::default(),
        }
    }
}

/// Designs the primer pair for a single edit of `plasmid`.
///
/// `edit_span` is 1-based inclusive; a pure insertion has
/// `end == start - 1`. `insert` is empty for deletions.
pub fn generate_primer_set(
    operation: OperationType,
    edit_span: EditSpan,
    plasmid: &Plasmid,
    insert: &str,
    preferences: &DesignPreferences,
) -> Result<PrimerSet, DesignError> {
    design_set(
        operation,
        edit_span,
        plasmid,
        &sanitize_dna_input(insert)?,
        preferences,
        preferences.hr_tm,
        false,
    )
}

/// Shared implementation behind [`generate_primer_set`] and the
/// subcloning composer, which overrides the homology target temperature
/// and tags regions with the subcloning kinds.
pub(crate) fn design_set(
    operation: OperationType,
    edit_span: EditSpan,
    plasmid: &Plasmid,
    insert: &[u8],
    preferences: &DesignPreferences,
    homology_tm: f64,
    subcloning: bool,
) -> Result<PrimerSet, DesignError> {
    edit_span.validate(plasmid.len())?;
    plasmid.validate_for_design()?;

    let (kind_homology, kind_tbr) = if subcloning {
        (
            RegionKind::SubcloningHomology,
            RegionKind::SubcloningTemplateBinding,
        )
    } else {
        (RegionKind::Homology, RegionKind::TemplateBinding)
    };
    let settings = &preferences.tm_settings;
    let hr_min = preferences.hr_min_length;
    // First plasmid base after the edited region.
    let tail_pos = edit_span.end + 1;
    let head_pos = edit_span.start;

    // Template-binding regions are needed by every strategy: forward on
    // the top strand past the edit, reverse on the bottom strand before it.
    let tbr_fwd = extend_primer(
        plasmid,
        tail_pos,
        Strand::Top,
        GrowthDirection::Forward,
        preferences.tbr_tm,
        preferences.tm_algorithm,
        TBR_MIN_LENGTH,
        b"",
        settings,
    )?;
    let tbr_rev = extend_primer(
        plasmid,
        head_pos,
        Strand::Bottom,
        GrowthDirection::Forward,
        preferences.tbr_tm,
        preferences.tm_algorithm,
        TBR_MIN_LENGTH,
        b"",
        settings,
    )?;
    let tbr_fwd_region =
        PrimerRegion::new(tbr_fwd, kind_tbr, Some(tail_pos), Direction::Forward);
    let tbr_rev_region =
        PrimerRegion::new(tbr_rev, kind_tbr, Some(head_pos), Direction::Reverse);

    let symmetry = if preferences.symmetric_primers {
        Symmetry::Symmetric
    } else {
        Symmetry::Asymmetric
    };
    let short_insertion = oligo_calc_tm(insert, settings) < preferences.max_tm_si;

    let (forward, reverse, hr_length, hr_tm);
    if short_insertion {
        // The insert alone cannot reach the homology temperature, so the
        // overlap borrows flanking plasmid bases.
        match symmetry {
            Symmetry::Asymmetric => {
                let homo_fwd = extend_primer(
                    plasmid,
                    head_pos,
                    Strand::Top,
                    GrowthDirection::Backward,
                    homology_tm,
                    TmAlgorithm::OligoCalc,
                    hr_min,
                    b"",
                    settings,
                )?;
                hr_length = homo_fwd.len();
                hr_tm = oligo_calc_tm(&homo_fwd, settings);
                forward = Primer::new(
                    "Forward Primer",
                    vec![
                        PrimerRegion::new(homo_fwd, kind_homology, Some(head_pos), Direction::Forward),
                        PrimerRegion::new(insert.to_vec(), RegionKind::Insert, None, Direction::Forward),
                        tbr_fwd_region,
                    ],
                );
                reverse = Primer::new("Reverse Primer", vec![tbr_rev_region]);
            }
            Symmetry::Symmetric => {
                let homo_fwd1 = extend_primer(
                    plasmid,
                    head_pos,
                    Strand::Top,
                    GrowthDirection::Backward,
                    homology_tm,
                    TmAlgorithm::OligoCalc,
                    hr_min,
                    b"",
                    settings,
                )?;
                let homo_fwd2 = extend_primer(
                    plasmid,
                    tail_pos,
                    Strand::Top,
                    GrowthDirection::Forward,
                    homology_tm,
                    TmAlgorithm::OligoCalc,
                    hr_min,
                    b"",
                    settings,
                )?;
                let mut overlap =
                    Vec::with_capacity(homo_fwd1.len() + insert.len() + homo_fwd2.len());
                overlap.extend_from_slice(&homo_fwd1);
                overlap.extend_from_slice(insert);
                overlap.extend_from_slice(&homo_fwd2);
                let trimmed = trim_homology(
                    &overlap,
                    homology_tm,
                    TmAlgorithm::OligoCalc,
                    hr_min,
                    TrimMode::Alternating,
                    settings,
                )?;

                // The removals eat into the flanking extensions only; the
                // insert itself stays intact on the short path.
                let cut5 = trimmed.removed_5.min(homo_fwd1.len());
                let cut3 = trimmed.removed_3.min(homo_fwd2.len());
                let homo_fwd1 = homo_fwd1[cut5..].to_vec();
                let homo_fwd2 = homo_fwd2[..homo_fwd2.len() - cut3].to_vec();
                let homo_rev = reverse_complement(&homo_fwd2);

                hr_length = trimmed.sequence.len();
                hr_tm = oligo_calc_tm(&trimmed.sequence, settings);
                forward = Primer::new(
                    "Forward Primer",
                    vec![
                        PrimerRegion::new(homo_fwd1, kind_homology, Some(head_pos), Direction::Forward),
                        PrimerRegion::new(insert.to_vec(), RegionKind::Insert, None, Direction::Forward),
                        tbr_fwd_region,
                    ],
                );
                reverse = Primer::new(
                    "Reverse Primer",
                    vec![
                        PrimerRegion::new(homo_rev, kind_homology, Some(tail_pos), Direction::Reverse),
                        PrimerRegion::new(
                            reverse_complement(insert),
                            RegionKind::Insert,
                            None,
                            Direction::Reverse,
                        ),
                        tbr_rev_region,
                    ],
                );
            }
        }
    } else {
        // Long path: the insert supplies the whole overlap and is trimmed
        // down to the homology temperature instead.
        match symmetry {
            Symmetry::Asymmetric => {
                let trimmed = trim_homology(
                    &reverse_complement(insert),
                    homology_tm,
                    TmAlgorithm::OligoCalc,
                    hr_min,
                    TrimMode::FivePrimeOnly,
                    settings,
                )?;
                hr_length = trimmed.sequence.len();
                hr_tm = oligo_calc_tm(&trimmed.sequence, settings);
                forward = Primer::new(
                    "Forward Primer",
                    vec![
                        PrimerRegion::new(insert.to_vec(), RegionKind::Insert, None, Direction::Forward),
                        tbr_fwd_region,
                    ],
                );
                reverse = Primer::new(
                    "Reverse Primer",
                    vec![
                        PrimerRegion::new(trimmed.sequence, RegionKind::Insert, None, Direction::Reverse),
                        tbr_rev_region,
                    ],
                );
            }
            Symmetry::Symmetric => {
                let trimmed = trim_homology(
                    insert,
                    homology_tm,
                    TmAlgorithm::OligoCalc,
                    hr_min,
                    TrimMode::Alternating,
                    settings,
                )?;
                let homo_fwd = insert[trimmed.removed_5.min(insert.len())..].to_vec();
                let insert_rc = reverse_complement(insert);
                let homo_rev = insert_rc[trimmed.removed_3.min(insert_rc.len())..].to_vec();

                hr_length = trimmed.sequence.len();
                hr_tm = oligo_calc_tm(&trimmed.sequence, settings);
                forward = Primer::new(
                    "Forward Primer",
                    vec![
                        PrimerRegion::new(homo_fwd, RegionKind::Insert, None, Direction::Forward),
                        tbr_fwd_region,
                    ],
                );
                reverse = Primer::new(
                    "Reverse Primer",
                    vec![
                        PrimerRegion::new(homo_rev, RegionKind::Insert, None, Direction::Reverse),
                        tbr_rev_region,
                    ],
                );
            }
        }
    }

    let title = if operation == OperationType::Deletion {
        operation.label().to_string()
    } else if short_insertion {
        format!("Short {}", operation.label())
    } else {
        format!("Long {}", operation.label())
    };

    let resulting_sequence =
        String::from_utf8_lossy(&plasmid.spliced_sequence(&edit_span, insert)).into_owned();

    Ok(PrimerSet {
        title,
        operation,
        symmetry,
        hr_length: vec![hr_length],
        hr_tm: vec![hr_tm],
        resulting_sequence,
        primers: vec![forward, reverse],
    })
}
