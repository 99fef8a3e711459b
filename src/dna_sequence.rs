//! Plasmid snapshots: sequence, topology and annotations.
//!
//! A [`Plasmid`] is an immutable snapshot as far as the design engine is
//! concerned; every edit produces a new snapshot. Coordinates in the
//! public API are 1-based inclusive, matching GenBank convention.

use crate::annotation::Annotation;
use crate::error::DesignError;
use crate::iupac_code;
use anyhow::Result;
use bio::io::fasta;
use gb_io::seq::{Feature, FeatureKind, Location, Seq, Topology};
use serde::{Deserialize, Serialize};
use std::{fmt, fs::File};

/// The region being replaced by an edit, 1-based inclusive.
/// A pure insertion immediately before `start` is encoded as
/// `end == start - 1` (zero-width span).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSpan {
    pub start: usize,
    pub end: usize,
}

impl EditSpan {
    /// Normalizes two selection endpoints into an ordered replacement span.
    pub fn replacement(pos1: usize, pos2: usize) -> Self {
        Self {
            start: pos1.min(pos2),
            end: pos1.max(pos2),
        }
    }

    /// Zero-width span immediately before `start`. Position 0 is not a
    /// valid insertion point and fails validation.
    pub fn insertion_before(start: usize) -> Self {
        Self {
            start,
            end: start.saturating_sub(1),
        }
    }

    #[inline(always)]
    pub fn is_insertion(&self) -> bool {
        self.end + 1 == self.start
    }

    /// Number of bases removed by the edit.
    #[inline(always)]
    pub fn edited_len(&self) -> usize {
        if self.is_insertion() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    pub fn validate(&self, sequence_len: usize) -> Result<(), DesignError> {
        let ok = if self.is_insertion() {
            self.start >= 1 && self.start <= sequence_len + 1
        } else {
            self.start >= 1 && self.start <= self.end && self.end <= sequence_len
        };
        if ok {
            Ok(())
        } else {
            Err(DesignError::InvalidSequence(format!(
                "edit span [{}, {}] does not fit a sequence of {} bp",
                self.start, self.end, sequence_len
            )))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plasmid {
    name: Option<String>,
    seq: Vec<u8>,
    topology: Topology,
    annotations: Vec<Annotation>,
}

impl Plasmid {
    /// Builds a linear plasmid from raw text. IUPAC ambiguity codes and
    /// stray characters are tolerated and normalized to `N`; design entry
    /// points reject `N` later.
    pub fn from_sequence(sequence: &str) -> Self {
        Self {
            name: None,
            seq: iupac_code::normalize(sequence.as_bytes()),
            topology: Topology::Linear,
            annotations: vec![],
        }
    }

    pub fn from_fasta_file(filename: &str) -> Result<Vec<Plasmid>> {
        let file = File::open(filename)?;
        Ok(fasta::Reader::new(file)
            .records()
            .filter_map(|record| record.ok())
            .map(|record| {
                let mut plasmid = Plasmid::from_sequence(&String::from_utf8_lossy(record.seq()));
                plasmid.name = Some(record.id().to_string());
                plasmid
            })
            .collect())
    }

    pub fn from_genbank_file(filename: &str) -> Result<Vec<Plasmid>> {
        Ok(gb_io::reader::parse_file(filename)?
            .into_iter()
            .map(Plasmid::from_genbank_seq)
            .collect())
    }

    pub fn from_genbank_seq(seq: Seq) -> Self {
        let annotations = seq
            .features
            .iter()
            .enumerate()
            .filter_map(|(i, feature)| {
                Annotation::from_genbank_feature(feature, &format!("feature-{}", i + 1))
            })
            .collect();
        Self {
            name: seq.name.clone(),
            topology: seq.topology,
            seq: iupac_code::normalize(&seq.seq),
            annotations,
        }
    }

    pub fn write_genbank_file(&self, filename: &str) -> Result<()> {
        let file = File::create(filename)?;
        gb_io::writer::write(file, &self.to_genbank_seq())?;
        Ok(())
    }

    pub fn to_genbank_seq(&self) -> Seq {
        let features = self
            .annotations
            .iter()
            .map(|ann| {
                let range = Location::simple_range(ann.span.0 as i64 - 1, ann.span.1 as i64);
                let location = match ann.directionality {
                    Some(crate::annotation::Directionality::Reverse) => {
                        Location::Complement(Box::new(range))
                    }
                    _ => range,
                };
                let mut qualifiers = vec![("label".into(), Some(ann.label.clone()))];
                if !ann.note.is_empty() {
                    qualifiers.push(("note".into(), Some(ann.note.clone())));
                }
                if let Some(translation) = &ann.translation {
                    qualifiers.push(("translation".into(), Some(translation.clone())));
                }
                Feature {
                    kind: FeatureKind::from(ann.kind.as_str()),
                    location,
                    qualifiers,
                }
            })
            .collect();
        Seq {
            name: self.name.clone(),
            topology: self.topology.clone(),
            date: None,
            len: Some(self.seq.len()),
            molecule_type: None,
            division: String::new(),
            definition: None,
            accession: None,
            version: None,
            source: None,
            dblink: None,
            keywords: None,
            references: vec![],
            comments: vec![],
            seq: self.seq.clone(),
            contig: None,
            features,
        }
    }

    #[inline(always)]
    pub fn forward(&self) -> &[u8] {
        &self.seq
    }

    pub fn get_forward_string(&self) -> String {
        String::from_utf8_lossy(&self.seq).to_string()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn is_circular(&self) -> bool {
        self.topology == Topology::Circular
    }

    pub fn set_circular(&mut self, is_circular: bool) {
        self.topology = match is_circular {
            true => Topology::Circular,
            false => Topology::Linear,
        };
    }

    pub fn name(&self) -> &Option<String> {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
    }

    pub fn push_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Substring of the sequence conceptually repeated three times, with
    /// both indices offset by `len`. Indices outside `[0, len)` wrap
    /// modulo the sequence length, so callers may use negative or
    /// overflowing indices transparently. `end` is exclusive.
    ///
    /// The extension loop never calls this with wrapping indices on a
    /// linear plasmid; it checks physical bounds first and fails with
    /// `OutOfBases` instead.
    pub fn repeating_slice(&self, start: isize, end: isize) -> Vec<u8> {
        repeating_slice(&self.seq, start, end)
    }

    /// The sequence with `span` replaced by `insert`.
    pub fn spliced_sequence(&self, span: &EditSpan, insert: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.seq.len() - span.edited_len() + insert.len());
        out.extend_from_slice(&self.seq[..span.start - 1]);
        out.extend_from_slice(insert);
        out.extend_from_slice(&self.seq[span.end..]);
        out
    }

    pub fn reverse_complement(&self) -> Vec<u8> {
        iupac_code::reverse_complement(&self.seq)
    }

    /// Design entry points accept unambiguous bases only.
    pub fn validate_for_design(&self) -> Result<(), DesignError> {
        validate_bases(&self.seq)
    }
}

impl fmt::Display for Plasmid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.seq))
    }
}

impl From<String> for Plasmid {
    fn from(s: String) -> Self {
        Plasmid::from_sequence(&s)
    }
}

/// Wrapping substring over any strand: conceptually the slice of the
/// sequence repeated three times with both indices offset by its length,
/// i.e. indices outside `[0, len)` wrap modulo `len`. `end` is exclusive.
pub fn repeating_slice(seq: &[u8], start: isize, end: isize) -> Vec<u8> {
    let len = seq.len() as isize;
    if len == 0 || start >= end {
        return vec![];
    }
    (start..end)
        .map(|i| seq[i.rem_euclid(len) as usize])
        .collect()
}

/// Uppercases and strips whitespace from caller-supplied DNA (e.g. an
/// insert), rejecting anything outside {A,C,G,T}.
pub fn sanitize_dna_input(input: &str) -> Result<Vec<u8>, DesignError> {
    let cleaned: Vec<u8> = input
        .bytes()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    validate_bases(&cleaned)?;
    Ok(cleaned)
}

fn validate_bases(sequence: &[u8]) -> Result<(), DesignError> {
    match sequence
        .iter()
        .find(|c| !iupac_code::is_unambiguous_base(**c))
    {
        Some(bad) => Err(DesignError::InvalidSequence(format!(
            "unexpected character '{}'",
            *bad as char
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_sequence_normalizes() {
        let plasmid = Plasmid::from_sequence("at gc\nWn");
        assert_eq!(plasmid.get_forward_string(), "ATGCNN");
        assert!(!plasmid.is_circular());
        assert!(plasmid.validate_for_design().is_err());
        assert!(Plasmid::from_sequence("ATGC").validate_for_design().is_ok());
    }

    #[test]
    fn test_repeating_slice_wraps_both_ends() {
        let plasmid = Plasmid::from_sequence("ACGTACG");
        assert_eq!(plasmid.repeating_slice(0, 3), b"ACG".to_vec());
        assert_eq!(plasmid.repeating_slice(-2, 2), b"CGAC".to_vec());
        assert_eq!(plasmid.repeating_slice(5, 9), b"CGAC".to_vec());
        assert_eq!(plasmid.repeating_slice(3, 3), b"".to_vec());
    }

    #[test]
    fn test_spliced_sequence_replacement_and_insertion() {
        let plasmid = Plasmid::from_sequence("AAACCCGGGTTT");
        // replace bases 4..=6 (CCC) with TT
        let spliced = plasmid.spliced_sequence(&EditSpan::replacement(4, 6), b"TT");
        assert_eq!(spliced, b"AAATTGGGTTT".to_vec());
        // pure insertion before base 4
        let spliced = plasmid.spliced_sequence(&EditSpan::insertion_before(4), b"TT");
        assert_eq!(spliced, b"AAATTCCCGGGTTT".to_vec());
        // deletion
        let spliced = plasmid.spliced_sequence(&EditSpan::replacement(4, 6), b"");
        assert_eq!(spliced, b"AAAGGGTTT".to_vec());
    }

    #[test]
    fn test_edit_span_validation() {
        assert!(EditSpan::replacement(1, 10).validate(10).is_ok());
        assert!(EditSpan::replacement(1, 11).validate(10).is_err());
        assert!(EditSpan::insertion_before(11).validate(10).is_ok());
        assert!(EditSpan::insertion_before(12).validate(10).is_err());
        assert_eq!(EditSpan::insertion_before(5).edited_len(), 0);
        assert_eq!(EditSpan::replacement(5, 5).edited_len(), 1);
    }

    #[test]
    fn test_sanitize_dna_input() {
        assert_eq!(sanitize_dna_input("at\ngc ").unwrap(), b"ATGC".to_vec());
        assert!(sanitize_dna_input("ATXGC").is_err());
        assert_eq!(sanitize_dna_input("").unwrap(), b"".to_vec());
    }

    #[test]
    fn test_fasta_roundtrip_via_tempfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">pTEST test plasmid\nACGTACGTAC\nGGGTTT").unwrap();
        let path = file.path().to_string_lossy().to_string();
        let plasmids = Plasmid::from_fasta_file(&path).unwrap();
        assert_eq!(plasmids.len(), 1);
        assert_eq!(plasmids[0].name().clone().unwrap(), "pTEST");
        assert_eq!(plasmids[0].get_forward_string(), "ACGTACGTACGGGTTT");
    }

    #[test]
    fn test_genbank_seq_conversion_roundtrip() {
        let mut plasmid = Plasmid::from_sequence("ACGTACGTACGT");
        plasmid.set_circular(true);
        plasmid.set_name("pROUND");
        plasmid.push_annotation(Annotation::new("a1", "tag", "misc_feature", (3, 8)));

        let seq = plasmid.to_genbank_seq();
        assert_eq!(seq.topology, Topology::Circular);
        assert_eq!(seq.features.len(), 1);

        let back = Plasmid::from_genbank_seq(seq);
        assert_eq!(back.annotations().len(), 1);
        assert_eq!(back.annotations()[0].span, (3, 8));
        assert_eq!(back.annotations()[0].label, "tag");
        assert!(back.is_circular());
    }
}
